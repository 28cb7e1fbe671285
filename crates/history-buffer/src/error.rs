//! History Buffer Error Types

use thiserror::Error;

/// Errors from single-element access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Requested index is not backed by a live element
    #[error("Index {index} out of bounds for buffer holding {len} elements")]
    OutOfBounds { index: usize, len: usize },
}

/// Errors in buffer configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A buffer needs at least one slot
    #[error("Buffer capacity must be greater than zero")]
    ZeroCapacity,
}
