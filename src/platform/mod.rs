//! Platform abstraction layer
//!
//! Host frame timing. Browser and native hosts both hand us monotonic
//! timestamps in seconds; the clock turns them into a bounded step.

use crate::consts::{FIRST_FRAME_DT, MAX_FRAME_DT};

/// Converts successive host timestamps into clamped frame deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous call, in `[0, MAX_FRAME_DT]`
    pub fn delta(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) => (now - last) as f32,
            None => FIRST_FRAME_DT,
        };
        self.last = Some(now);
        if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        }
    }

    /// Forget the previous timestamp, e.g. after the page was hidden
    pub fn reset(&mut self) {
        self.last = None;
    }
}
