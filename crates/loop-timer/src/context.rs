//! Shared stop signal for a group of timers

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::info;

#[derive(Debug, Default)]
struct Shared {
    killed: Mutex<bool>,
    trigger: Condvar,
}

/// Stop signal shared by every timer created from it.
///
/// Cloning is cheap; all clones refer to the same signal.
#[derive(Debug, Clone, Default)]
pub struct TimerContext {
    shared: Arc<Shared>,
}

impl TimerContext {
    /// Create a new, running context
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.shared.killed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wake every waiting timer and make all further waits return at once
    pub fn kill_all(&self) {
        {
            let mut killed = self.lock();
            if *killed {
                return;
            }
            *killed = true;
        }
        info!("Stopping all loop timers");
        self.shared.trigger.notify_all();
    }

    /// Check if [`Self::kill_all`] was called
    pub fn is_killed(&self) -> bool {
        *self.lock()
    }

    /// Block until `deadline` or until killed.
    ///
    /// Returns `true` if woken by [`Self::kill_all`].
    pub(crate) fn wait_until(&self, deadline: Instant) -> bool {
        let mut killed = self.lock();
        loop {
            if *killed {
                return true;
            }

            let now = Instant::now();
            if now >= deadline {
                return false;
            }

            killed = self
                .shared
                .trigger
                .wait_timeout(killed, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wait_reaches_deadline() {
        let context = TimerContext::new();
        let start = Instant::now();

        assert!(!context.wait_until(start + Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_kill_wakes_waiters() {
        let context = TimerContext::new();
        let waiter = {
            let context = context.clone();
            thread::spawn(move || context.wait_until(Instant::now() + Duration::from_secs(30)))
        };

        thread::sleep(Duration::from_millis(20));
        context.kill_all();

        assert!(waiter.join().unwrap());
        assert!(context.is_killed());
    }

    #[test]
    fn test_contexts_are_independent() {
        let first = TimerContext::new();
        let second = TimerContext::new();
        first.kill_all();

        assert!(first.is_killed());
        assert!(!second.is_killed());
        assert!(first.wait_until(Instant::now() + Duration::from_secs(30)));
    }
}
