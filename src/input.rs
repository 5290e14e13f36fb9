//! Edge detection for the momentary push buttons.

use std::time::{Duration, Instant};

/// Turns raw level samples into debounced press edges.
///
/// A press is a released → pressed transition. After a press is accepted,
/// further transitions inside the settle window are ignored; the loop keeps
/// running instead of sleeping through the bounce.
#[derive(Clone, Debug)]
pub struct Button {
    settle: Duration,
    was_pressed: bool,
    last_edge: Option<Instant>,
}

impl Button {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            was_pressed: false,
            last_edge: None,
        }
    }

    /// Feeds one sample and reports whether it completes a debounced press.
    pub fn sample(&mut self, pressed: bool, now: Instant) -> bool {
        let rising = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        if !rising {
            return false;
        }

        if let Some(last) = self.last_edge
            && now.duration_since(last) < self.settle
        {
            return false;
        }
        self.last_edge = Some(now);
        true
    }
}
