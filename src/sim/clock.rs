//! Simulated clock and cooldown helpers
//!
//! Time is simulated milliseconds since the session started. The clock only
//! advances while the simulation is running, so cooldowns freeze while paused.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    /// Current time (ms)
    now_ms: f64,
    /// Delta of the last advance (seconds)
    delta: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Advance by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.delta = dt;
        self.now_ms += dt as f64 * 1000.0;
    }

    /// Milliseconds elapsed since `since_ms`
    #[inline]
    pub fn since(&self, since_ms: f64) -> f64 {
        self.now_ms - since_ms
    }

    /// Whether strictly more than `cooldown_ms` has passed since `last`.
    /// An action that was never used is always ready.
    #[inline]
    pub fn ready(&self, last: Option<f64>, cooldown_ms: f64) -> bool {
        match last {
            None => true,
            Some(t) => self.since(t) > cooldown_ms,
        }
    }

    /// Whether `deadline_ms` has been passed
    #[inline]
    pub fn passed(&self, deadline_ms: f64) -> bool {
        self.now_ms > deadline_ms
    }

    /// Jump to an absolute time (scripted scenarios)
    pub fn set(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }
}
