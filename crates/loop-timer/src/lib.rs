//! Loop Timers
//!
//! Paces worker loops at a fixed interval. Timers created from the same
//! [`TimerContext`] can all be woken and stopped at once.

mod context;
mod stopwatch;
mod timer;

pub use context::TimerContext;
pub use stopwatch::Stopwatch;
pub use timer::LoopTimer;
