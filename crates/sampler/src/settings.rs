//! Sampler settings

use std::path::Path;

use config::{Config, Environment, File};
use history_buffer::{BufferConfig, ReadMode};
use serde::{Deserialize, Serialize};

use crate::SamplerError;

/// Top-level sampler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    /// Shared history buffer
    pub buffer: BufferConfig,
    /// Sample producer
    pub producer: ProducerSettings,
    /// One entry per consumer thread
    pub consumers: Vec<ConsumerSettings>,
    /// Log output
    pub log: LogSettings,
}

/// Producer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerSettings {
    /// Interval between samples (milliseconds)
    pub interval_ms: u64,
    /// Number of samples to produce before stopping
    pub samples: u64,
}

/// Consumer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerSettings {
    /// Name used in logs and reports
    pub name: String,
    /// Maximum samples per poll
    pub amount: usize,
    /// How to handle a backlog larger than `amount`
    #[serde(default)]
    pub mode: ReadMode,
    /// Only accept full batches of `amount`
    #[serde(default)]
    pub exact: bool,
    /// Interval between polls (milliseconds)
    pub interval_ms: u64,
}

/// Log settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            buffer: BufferConfig::with_capacity(64),
            producer: ProducerSettings::default(),
            consumers: vec![
                ConsumerSettings::new("continuous", 8, ReadMode::Continuous, 100),
                ConsumerSettings::new("windowed", 8, ReadMode::Windowed, 100),
                ConsumerSettings {
                    exact: true,
                    ..ConsumerSettings::new("batches", 16, ReadMode::Continuous, 50)
                },
            ],
            log: LogSettings::default(),
        }
    }
}

impl Default for ProducerSettings {
    fn default() -> Self {
        Self {
            interval_ms: 20,
            samples: 200,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ConsumerSettings {
    /// Create consumer settings without exact batching
    pub fn new(name: &str, amount: usize, mode: ReadMode, interval_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            amount,
            mode,
            exact: false,
            interval_ms,
        }
    }
}

/// `SAMPLER_` prefixed variables, `__` between nested keys
fn environment() -> Environment {
    Environment::with_prefix("SAMPLER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl SamplerSettings {
    /// Load settings from `sampler.{toml,json,yaml}` in the working
    /// directory, then `path` if given, then `SAMPLER_*` environment
    /// variables (nested keys separated by `__`, e.g.
    /// `SAMPLER_PRODUCER__SAMPLES=500`).
    pub fn load(path: Option<&Path>) -> Result<Self, SamplerError> {
        let mut builder = Config::builder().add_source(File::with_name("sampler").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Self = builder
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings describe a runnable sampler
    pub fn validate(&self) -> Result<(), SamplerError> {
        self.buffer.validate()?;

        if self.producer.interval_ms == 0 {
            return Err(SamplerError::InvalidSetting {
                field: "producer.interval_ms".to_string(),
                reason: "must be greater than zero",
            });
        }

        for consumer in &self.consumers {
            if consumer.amount == 0 {
                return Err(SamplerError::InvalidSetting {
                    field: format!("consumers.{}.amount", consumer.name),
                    reason: "must be greater than zero",
                });
            }
            if consumer.exact && consumer.amount > self.buffer.capacity {
                return Err(SamplerError::InvalidSetting {
                    field: format!("consumers.{}.amount", consumer.name),
                    reason: "exact batches cannot exceed the buffer capacity",
                });
            }
            if consumer.interval_ms == 0 {
                return Err(SamplerError::InvalidSetting {
                    field: format!("consumers.{}.interval_ms", consumer.name),
                    reason: "must be greater than zero",
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = SamplerSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.consumers.len(), 3);
        assert!(settings.consumers[2].exact);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[buffer]
capacity = 16

[producer]
samples = 40

[[consumers]]
name = "audit"
amount = 4
mode = "continuous"
interval_ms = 10
"#
        )
        .unwrap();

        let settings = SamplerSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.buffer.capacity, 16);
        assert_eq!(settings.producer.samples, 40);
        assert_eq!(settings.producer.interval_ms, 20);
        assert_eq!(
            settings.consumers,
            vec![ConsumerSettings::new("audit", 4, ReadMode::Continuous, 10)]
        );
        assert_eq!(settings.log, LogSettings::default());
    }

    #[test]
    fn test_environment_overrides() {
        let vars: config::Map<String, String> = [
            ("SAMPLER_PRODUCER__SAMPLES", "500"),
            ("SAMPLER_BUFFER__CAPACITY", "32"),
            ("SAMPLER_LOG__LEVEL", "debug"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings: SamplerSettings = Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.producer.samples, 500);
        assert_eq!(settings.buffer.capacity, 32);
        assert_eq!(settings.log.level, "debug");
        assert_eq!(settings.producer.interval_ms, 20);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = SamplerSettings::load(Some(Path::new("/nonexistent/sampler.toml")));
        assert!(matches!(result, Err(SamplerError::Config(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut settings = SamplerSettings::default();
        settings.buffer.capacity = 0;
        assert!(matches!(settings.validate(), Err(SamplerError::Buffer(_))));

        let mut settings = SamplerSettings::default();
        settings.consumers[1].amount = 0;
        match settings.validate() {
            Err(SamplerError::InvalidSetting { field, .. }) => {
                assert_eq!(field, "consumers.windowed.amount")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_exact_amount_limited_by_capacity() {
        let mut settings = SamplerSettings::default();
        settings.buffer.capacity = 8;
        match settings.validate() {
            Err(SamplerError::InvalidSetting { field, .. }) => {
                assert_eq!(field, "consumers.batches.amount")
            }
            other => panic!("unexpected result: {:?}", other),
        }

        settings.consumers[2].amount = 8;
        assert!(settings.validate().is_ok());

        settings.consumers[2].exact = false;
        settings.consumers[2].amount = 32;
        assert!(settings.validate().is_ok());
    }
}
