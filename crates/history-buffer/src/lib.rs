//! Bounded History Buffer
//!
//! Provides a fixed-capacity, thread-safe sliding window over the most
//! recent samples, with cursor-based incremental reads for any number of
//! independent consumers.

mod buffer;
mod config;
mod error;
mod extract;
mod retrieval;
pub mod rollover;
mod store;

pub use buffer::RingBuffer;
pub use config::{BufferConfig, DEFAULT_CAPACITY};
pub use error::{BufferError, ConfigError};
pub use retrieval::ReadMode;
pub use rollover::{add_rollover, decrement, increment, sub_rollover, Rollover};
