#![forbid(unsafe_code)]

//! Cancellable frame counter owned by an interaction session.
//!
//! The ticker does not schedule anything itself. The host asks
//! [`Ticker::is_running`] after every frame and schedules the next one only
//! while it returns `true`.

/// Frame counter with explicit start/stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ticker {
    running: bool,
    frames: u64,
}

impl Ticker {
    /// A stopped ticker with zero frames.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            running: false,
            frames: 0,
        }
    }

    /// Start (or restart) the ticker, resetting the frame count.
    pub fn start(&mut self) {
        self.running = true;
        self.frames = 0;
    }

    /// Stop the ticker. Further [`advance`](Self::advance) calls are ignored.
    pub fn stop(&mut self) {
        self.running = false;
    }

    #[inline]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Frames advanced since the last start.
    #[inline]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Record one frame. Returns `false` when stopped.
    pub fn advance(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.frames = self.frames.saturating_add(1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_ticker_ignores_frames() {
        let mut ticker = Ticker::new();
        assert!(!ticker.advance());
        assert_eq!(ticker.frames(), 0);
    }

    #[test]
    fn start_resets_count() {
        let mut ticker = Ticker::new();
        ticker.start();
        ticker.advance();
        ticker.advance();
        assert_eq!(ticker.frames(), 2);
        ticker.stop();
        assert!(!ticker.is_running());
        ticker.start();
        assert_eq!(ticker.frames(), 0);
    }
}
