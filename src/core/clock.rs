//! Simulation Clocks
//!
//! The simulation never reads time on its own. Each frame the caller hands
//! `step()` a timestamp taken from one of these clocks.

use std::time::Instant;

/// Source of monotonic timestamps in seconds.
pub trait Clock {
    /// Seconds elapsed since the clock's origin.
    fn now(&self) -> f64;
}

/// Deterministic clock derived from the frame counter.
///
/// Used for headless runs and replays: frame `n` at `rate` Hz is
/// timestamp `n / rate`.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    frame: u64,
    rate: u32,
}

impl FrameClock {
    /// Create a clock at frame 0 ticking at `rate` frames per second.
    pub fn new(rate: u32) -> Self {
        Self { frame: 0, rate: rate.max(1) }
    }

    /// Advance by one frame.
    pub fn advance(&mut self) {
        self.frame += 1;
    }

    /// Current frame number.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Clock for FrameClock {
    fn now(&self) -> f64 {
        self.frame as f64 / self.rate as f64
    }
}

/// Wall clock backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock at the current instant.
    pub fn start() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::new(60);
        assert_eq!(clock.now(), 0.0);

        for _ in 0..120 {
            clock.advance();
        }
        assert_eq!(clock.frame(), 120);
        assert!((clock.now() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::start();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
