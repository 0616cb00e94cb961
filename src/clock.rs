// src/clock.rs

//! Fixed-rate tick for the viewer loop.

use std::thread;
use std::time::{Duration, Instant};

use log::trace;

use crate::config::TimingConfig;

/// Paces the loop at one iteration per `tick` and reports the time elapsed
/// since the previous tick, capped at `max_delta`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    tick: Duration,
    max_delta: Duration,
    last: Instant,
}

impl FrameClock {
    pub fn new(timing: &TimingConfig) -> Self {
        FrameClock {
            tick: Duration::from_millis(timing.tick_ms),
            max_delta: Duration::from_millis(timing.max_delta_ms),
            last: Instant::now(),
        }
    }

    /// Restarts timing from now, e.g. at the start of a session.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Sleeps until one tick has passed since the previous call, then
    /// returns the capped elapsed time.
    pub fn wait_for_tick(&mut self) -> Duration {
        let deadline = self.last + self.tick;
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        let now = Instant::now();
        let delta = self.delta_since(now);
        self.last = now;
        trace!("Clock: tick, delta {:?}", delta);
        delta
    }

    /// Time from the previous tick to `now`, capped at `max_delta`.
    pub fn delta_since(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last).min(self.max_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(tick_ms: u64, max_delta_ms: u64) -> FrameClock {
        FrameClock::new(&TimingConfig {
            tick_ms,
            max_delta_ms,
        })
    }

    #[test]
    fn delta_is_capped() {
        let c = clock(33, 50);
        let later = c.last + Duration::from_millis(400);
        assert_eq!(c.delta_since(later), Duration::from_millis(50));
        let soon = c.last + Duration::from_millis(20);
        assert_eq!(c.delta_since(soon), Duration::from_millis(20));
    }

    #[test]
    fn delta_before_last_tick_is_zero() {
        let c = clock(33, 50);
        assert_eq!(c.delta_since(c.last), Duration::ZERO);
    }

    #[test]
    fn wait_for_tick_waits_at_least_one_tick() {
        let mut c = clock(10, 50);
        c.reset();
        let start = Instant::now();
        c.wait_for_tick();
        assert!(start.elapsed() >= Duration::from_millis(9));
    }

    #[test]
    fn wait_for_tick_does_not_sleep_when_late() {
        let mut c = clock(5, 50);
        c.last = Instant::now() - Duration::from_millis(200);
        let delta = c.wait_for_tick();
        assert_eq!(delta, Duration::from_millis(50));
    }
}
