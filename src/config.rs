use serde::Deserialize;
use serde_json::json;

use crate::logging::{log_event, LogLevel};
use crate::page::Page;

pub const CONFIG_ELEMENT_ID: &str = "effects-config";

const DEFAULT_LOADING_DELAY_MS: u32 = 3_000;
const DEFAULT_DEFERRED_INIT_DELAY_MS: u32 = 1_000;
const DEFAULT_NAVBAR_THRESHOLD_PX: f64 = 100.0;
const DEFAULT_HEADER_OFFSET_PX: f64 = 80.0;
const DEFAULT_TRAIL_BREAKPOINT_PX: f64 = 968.0;
const DEFAULT_TRAIL_MARKERS: usize = 12;
const DEFAULT_TYPING_START_DELAY_MS: u32 = 2_000;
const DEFAULT_TYPING_CHAR_INTERVAL_MS: u32 = 100;
const DEFAULT_SCROLL_THROTTLE_MS: u32 = 0;
const DEFAULT_RESPECT_REDUCED_MOTION: bool = true;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const LOADING_DELAY_MS_BOUNDS: (u32, u32) = (0, 60_000);
const DEFERRED_INIT_DELAY_MS_BOUNDS: (u32, u32) = (0, 60_000);
const NAVBAR_THRESHOLD_PX_BOUNDS: (f64, f64) = (0.0, 10_000.0);
const HEADER_OFFSET_PX_BOUNDS: (f64, f64) = (0.0, 1_000.0);
const TRAIL_BREAKPOINT_PX_BOUNDS: (f64, f64) = (0.0, 10_000.0);
const TRAIL_MARKERS_BOUNDS: (usize, usize) = (1, 64);
const TYPING_START_DELAY_MS_BOUNDS: (u32, u32) = (0, 60_000);
const TYPING_CHAR_INTERVAL_MS_BOUNDS: (u32, u32) = (10, 5_000);
const SCROLL_THROTTLE_MS_BOUNDS: (u32, u32) = (0, 1_000);

/// Tunables shared by every effect.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectsConfig {
    pub loading_delay_ms: u32,
    pub deferred_init_delay_ms: u32,
    pub navbar_threshold_px: f64,
    pub header_offset_px: f64,
    pub trail_breakpoint_px: f64,
    pub trail_markers: usize,
    pub typing_start_delay_ms: u32,
    pub typing_char_interval_ms: u32,
    pub scroll_throttle_ms: u32,
    pub respect_reduced_motion: bool,
    pub log_level: LogLevel,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            loading_delay_ms: DEFAULT_LOADING_DELAY_MS,
            deferred_init_delay_ms: DEFAULT_DEFERRED_INIT_DELAY_MS,
            navbar_threshold_px: DEFAULT_NAVBAR_THRESHOLD_PX,
            header_offset_px: DEFAULT_HEADER_OFFSET_PX,
            trail_breakpoint_px: DEFAULT_TRAIL_BREAKPOINT_PX,
            trail_markers: DEFAULT_TRAIL_MARKERS,
            typing_start_delay_ms: DEFAULT_TYPING_START_DELAY_MS,
            typing_char_interval_ms: DEFAULT_TYPING_CHAR_INTERVAL_MS,
            scroll_throttle_ms: DEFAULT_SCROLL_THROTTLE_MS,
            respect_reduced_motion: DEFAULT_RESPECT_REDUCED_MOTION,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawEffectsConfig {
    loading_delay_ms: Option<u32>,
    deferred_init_delay_ms: Option<u32>,
    navbar_threshold_px: Option<f64>,
    header_offset_px: Option<f64>,
    trail_breakpoint_px: Option<f64>,
    trail_markers: Option<usize>,
    typing_start_delay_ms: Option<u32>,
    typing_char_interval_ms: Option<u32>,
    scroll_throttle_ms: Option<u32>,
    respect_reduced_motion: Option<bool>,
    log_level: Option<String>,
}

impl EffectsConfig {
    /// Reads the JSON island `#effects-config`, falling back to defaults.
    pub fn load<P: Page + ?Sized>(page: &P) -> Self {
        let Some(island) = page.element_by_id(CONFIG_ELEMENT_ID) else {
            return Self::default();
        };

        let text = page.text_content(&island);
        if text.trim().is_empty() {
            return Self::default();
        }

        match Self::from_json(&text) {
            Ok(config) => config,
            Err(error) => {
                let fallback = Self::default();
                log_event(
                    page,
                    &fallback,
                    LogLevel::Warn,
                    "config_fallback",
                    json!({ "error": error.to_string() }),
                );
                fallback
            }
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: RawEffectsConfig = serde_json::from_str(text)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawEffectsConfig) -> Self {
        Self {
            loading_delay_ms: within_bounds(
                raw.loading_delay_ms,
                DEFAULT_LOADING_DELAY_MS,
                LOADING_DELAY_MS_BOUNDS,
            ),
            deferred_init_delay_ms: within_bounds(
                raw.deferred_init_delay_ms,
                DEFAULT_DEFERRED_INIT_DELAY_MS,
                DEFERRED_INIT_DELAY_MS_BOUNDS,
            ),
            navbar_threshold_px: within_bounds(
                raw.navbar_threshold_px,
                DEFAULT_NAVBAR_THRESHOLD_PX,
                NAVBAR_THRESHOLD_PX_BOUNDS,
            ),
            header_offset_px: within_bounds(
                raw.header_offset_px,
                DEFAULT_HEADER_OFFSET_PX,
                HEADER_OFFSET_PX_BOUNDS,
            ),
            trail_breakpoint_px: within_bounds(
                raw.trail_breakpoint_px,
                DEFAULT_TRAIL_BREAKPOINT_PX,
                TRAIL_BREAKPOINT_PX_BOUNDS,
            ),
            trail_markers: within_bounds(
                raw.trail_markers,
                DEFAULT_TRAIL_MARKERS,
                TRAIL_MARKERS_BOUNDS,
            ),
            typing_start_delay_ms: within_bounds(
                raw.typing_start_delay_ms,
                DEFAULT_TYPING_START_DELAY_MS,
                TYPING_START_DELAY_MS_BOUNDS,
            ),
            typing_char_interval_ms: within_bounds(
                raw.typing_char_interval_ms,
                DEFAULT_TYPING_CHAR_INTERVAL_MS,
                TYPING_CHAR_INTERVAL_MS_BOUNDS,
            ),
            scroll_throttle_ms: within_bounds(
                raw.scroll_throttle_ms,
                DEFAULT_SCROLL_THROTTLE_MS,
                SCROLL_THROTTLE_MS_BOUNDS,
            ),
            respect_reduced_motion: raw
                .respect_reduced_motion
                .unwrap_or(DEFAULT_RESPECT_REDUCED_MOTION),
            log_level: raw
                .log_level
                .as_deref()
                .and_then(LogLevel::parse)
                .unwrap_or(DEFAULT_LOG_LEVEL),
        }
    }
}

fn within_bounds<T: PartialOrd + Copy>(value: Option<T>, default: T, bounds: (T, T)) -> T {
    value
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}
