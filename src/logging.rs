use std::cmp::Ordering;

use crate::config::EffectsConfig;
use crate::page::Page;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(level: LogLevel) -> u8 {
            match level {
                LogLevel::Debug => 0,
                LogLevel::Info => 1,
                LogLevel::Warn => 2,
            }
        }

        rank(*self).cmp(&rank(*other))
    }
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            _ => None,
        }
    }
}

/// Writes one JSON object per event to the page console.
pub fn log_event<P: Page + ?Sized>(
    page: &P,
    config: &EffectsConfig,
    level: LogLevel,
    event: &str,
    fields: serde_json::Value,
) {
    if level < config.log_level {
        return;
    }

    let mut payload = serde_json::Map::new();
    payload.insert(
        "ts".to_string(),
        serde_json::Value::Number(serde_json::Number::from(now_unix_millis(page))),
    );
    payload.insert("level".to_string(), serde_json::Value::String(level.as_str().to_string()));
    payload.insert("event".to_string(), serde_json::Value::String(event.to_string()));

    if let serde_json::Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    page.console_log(&serde_json::Value::Object(payload).to_string(), None);
}

fn now_unix_millis<P: Page + ?Sized>(page: &P) -> u64 {
    let now = page.now_ms();
    if now.is_finite() && now > 0.0 {
        now as u64
    } else {
        0
    }
}
