use std::cell::Cell;

/// Lets a call through at most once per interval. An interval of zero lets
/// every call through.
#[derive(Debug)]
pub struct Throttle {
    interval_ms: f64,
    last_call: Cell<Option<f64>>,
}

impl Throttle {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: f64::from(interval_ms),
            last_call: Cell::new(None),
        }
    }

    pub fn ready(&self, now_ms: f64) -> bool {
        if self.interval_ms <= 0.0 {
            return true;
        }

        match self.last_call.get() {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_call.set(Some(now_ms));
                true
            }
        }
    }
}
