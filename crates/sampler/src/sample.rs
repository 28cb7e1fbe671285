//! Sample record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reading written by the producer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Producer-assigned sequence number, starting at 0
    pub sequence: u64,
    /// Wall-clock time of the reading
    pub timestamp: DateTime<Utc>,
    /// Measured value
    pub value: f64,
}

impl Sample {
    /// Create a sample taken now
    pub fn new(sequence: u64, value: f64) -> Self {
        Self {
            sequence,
            timestamp: Utc::now(),
            value,
        }
    }

    /// Synthetic sine reading (amplitude 100, period ~63 samples)
    pub fn synthetic(sequence: u64) -> Self {
        Self::new(sequence, (sequence as f64 * 0.1).sin() * 100.0)
    }
}
