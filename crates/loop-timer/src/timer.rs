//! Fixed-interval loop timer

use std::time::{Duration, Instant};

use tracing::debug;

use crate::context::TimerContext;

/// Paces a loop so each iteration starts `wait_time` after the previous tick.
///
/// ```no_run
/// use loop_timer::{LoopTimer, TimerContext};
/// use std::time::Duration;
///
/// let context = TimerContext::new();
/// let mut timer = LoopTimer::new(&context, Duration::from_millis(200), true);
///
/// while timer.wait_on_tick() {
///     // poll, sample, publish...
/// }
/// ```
#[derive(Debug)]
pub struct LoopTimer {
    context: TimerContext,
    wait_time: Duration,
    next_cycle: Instant,
}

impl LoopTimer {
    /// Create a timer. With `start_immediately` the first tick fires at once,
    /// otherwise after one `wait_time`.
    pub fn new(context: &TimerContext, wait_time: Duration, start_immediately: bool) -> Self {
        let now = Instant::now();
        debug!("Creating loop timer with interval {:?}", wait_time);
        Self {
            context: context.clone(),
            wait_time,
            next_cycle: if start_immediately { now } else { now + wait_time },
        }
    }

    /// Create a timer with a millisecond interval
    pub fn from_millis(context: &TimerContext, wait_time_ms: u64, start_immediately: bool) -> Self {
        Self::new(context, Duration::from_millis(wait_time_ms), start_immediately)
    }

    /// Block until the next tick.
    ///
    /// Returns `false` once the context was killed; the caller should leave
    /// its loop.
    pub fn wait_on_tick(&mut self) -> bool {
        let killed = self.context.wait_until(self.next_cycle);
        self.next_cycle = Instant::now() + self.wait_time;
        !killed
    }

    /// Change the interval, effective from the next scheduled tick
    pub fn set_wait_time(&mut self, wait_time: Duration) {
        self.wait_time = wait_time;
    }

    /// Current interval
    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }
}
