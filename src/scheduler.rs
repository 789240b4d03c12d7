//! Phase-gated fixed-interval tickers
//!
//! A ticker only accumulates time while started. Cancelling drops any
//! partial interval, so a ticker restarted later never fires a stale tick.

/// Fixed timestep accumulator that can be switched on and off
#[derive(Debug, Clone)]
pub struct FixedTicker {
    /// Seconds per tick
    interval: f32,
    accumulator: f32,
    enabled: bool,
    /// Cap on ticks per `advance` call (spiral of death guard)
    max_steps: u32,
}

impl FixedTicker {
    pub fn new(hz: f32, max_steps: u32) -> Self {
        Self {
            interval: 1.0 / hz,
            accumulator: 0.0,
            enabled: false,
            max_steps: max_steps.max(1),
        }
    }

    /// Enable from a clean accumulator
    pub fn start(&mut self) {
        self.enabled = true;
        self.accumulator = 0.0;
    }

    /// Disable and discard any partial interval
    pub fn cancel(&mut self) {
        self.enabled = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.enabled
    }

    /// Add frame time; returns the number of whole ticks due
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !self.enabled || !(frame_dt > 0.0) {
            return 0;
        }

        self.accumulator = (self.accumulator + frame_dt).min(self.interval * self.max_steps as f32);
        let steps = ((self.accumulator / self.interval) as u32).min(self.max_steps);
        self.accumulator -= steps as f32 * self.interval;
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_never_ticks() {
        let mut ticker = FixedTicker::new(60.0, 8);
        assert_eq!(ticker.advance(1.0), 0);
    }

    #[test]
    fn test_accumulates_partial() {
        let mut ticker = FixedTicker::new(60.0, 8);
        ticker.start();
        assert_eq!(ticker.advance(0.008), 0);
        assert_eq!(ticker.advance(0.010), 1);
    }

    #[test]
    fn test_caps_substeps() {
        let mut ticker = FixedTicker::new(60.0, 8);
        ticker.start();
        assert_eq!(ticker.advance(1.0), 8);
        // Backlog was dropped, not carried
        assert_eq!(ticker.advance(0.001), 0);
    }

    #[test]
    fn test_cancel_discards_partial_interval() {
        let mut ticker = FixedTicker::new(60.0, 8);
        ticker.start();
        ticker.advance(0.015);
        ticker.cancel();
        assert!(!ticker.is_running());
        ticker.start();
        assert_eq!(ticker.advance(0.002), 0);
    }

    #[test]
    fn test_ignores_negative_and_nan_dt() {
        let mut ticker = FixedTicker::new(60.0, 8);
        ticker.start();
        assert_eq!(ticker.advance(-1.0), 0);
        assert_eq!(ticker.advance(f32::NAN), 0);
        assert_eq!(ticker.advance(0.02), 1);
    }
}
