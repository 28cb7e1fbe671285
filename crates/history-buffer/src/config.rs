//! Buffer configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default buffer capacity (3000 samples = ~10 min at 5Hz)
pub const DEFAULT_CAPACITY: usize = 3000;

/// History buffer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Number of samples kept before the oldest is overwritten
    pub capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl BufferConfig {
    /// Create a config with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Check the config describes a usable buffer
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}
