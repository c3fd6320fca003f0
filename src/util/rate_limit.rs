//! Outbound input throttling

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use governor::{
    clock::{Clock, FakeRelativeClock},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};

/// Minimum spacing between input reports, in milliseconds (~60Hz)
pub const MIN_INPUT_INTERVAL_MS: u64 = 16;

/// Rate limiter driven by frame timestamps instead of the wall clock
pub type FrameLimiter = RateLimiter<
    NotKeyed,
    InMemoryState,
    FakeRelativeClock,
    NoOpMiddleware<<FakeRelativeClock as Clock>::Instant>,
>;

/// Lets at most one input report through per window.
///
/// Intents offered while the window is closed are dropped, not queued.
pub struct InputThrottle {
    limiter: FrameLimiter,
    clock: FakeRelativeClock,
    /// How far `clock` has been advanced, in session milliseconds
    clock_ms: u64,
}

impl InputThrottle {
    pub fn new(min_interval_ms: u64) -> Self {
        let quota = Quota::with_period(Duration::from_millis(min_interval_ms))
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX));
        let clock = FakeRelativeClock::default();
        Self {
            limiter: RateLimiter::direct_with_clock(quota, &clock),
            clock,
            clock_ms: 0,
        }
    }

    /// Check if a report may be sent at `now_ms`; records the send if so
    pub fn check(&mut self, now_ms: u64) -> bool {
        // Frame time never runs backwards for the limiter
        if now_ms > self.clock_ms {
            self.clock
                .advance(Duration::from_millis(now_ms - self.clock_ms));
            self.clock_ms = now_ms;
        }
        self.limiter.check().is_ok()
    }
}

impl fmt::Debug for InputThrottle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputThrottle")
            .field("clock_ms", &self.clock_ms)
            .finish_non_exhaustive()
    }
}

impl Default for InputThrottle {
    fn default() -> Self {
        Self::new(MIN_INPUT_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_offers_emit_once() {
        let mut throttle = InputThrottle::default();
        let sent = [100, 105].into_iter().filter(|&t| throttle.check(t)).count();
        assert_eq!(sent, 1);
    }

    #[test]
    fn spaced_offers_emit_each() {
        let mut throttle = InputThrottle::default();
        let sent = [100, 120].into_iter().filter(|&t| throttle.check(t)).count();
        assert_eq!(sent, 2);
    }

    #[test]
    fn window_measured_from_last_emit() {
        let mut throttle = InputThrottle::default();
        let sent: Vec<bool> = [0, 10, 15, 16, 31, 32]
            .into_iter()
            .map(|t| throttle.check(t))
            .collect();
        assert_eq!(sent, vec![true, false, false, true, false, true]);
    }

    #[test]
    fn first_offer_always_passes() {
        let mut throttle = InputThrottle::default();
        assert!(throttle.check(0));
    }

    #[test]
    fn stale_timestamp_does_not_reopen_window() {
        let mut throttle = InputThrottle::default();
        assert!(throttle.check(50));
        assert!(!throttle.check(40));
        assert!(throttle.check(66));
    }

    #[test]
    fn zero_interval_never_throttles() {
        let mut throttle = InputThrottle::new(0);
        assert!((0..5).all(|_| throttle.check(7)));
    }
}
