//! Elapsed-time measurement

use std::time::{Duration, Instant};

/// Measures time since creation or the last reset
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    last: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a running stopwatch
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }

    /// Restart measuring from now
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Time since the last reset
    pub fn elapsed(&self) -> Duration {
        self.last.elapsed()
    }

    /// Seconds since the last reset
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}
