//! History Sampler
//!
//! Drives a shared history buffer with one producer thread and any number
//! of polling consumer threads, each with its own cursor.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use history_buffer::RingBuffer;
use loop_timer::{Stopwatch, TimerContext};
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod consumer;
mod producer;
mod sample;
mod settings;

pub use consumer::{Consumer, ConsumerReport};
pub use producer::produce;
pub use sample::Sample;
pub use settings::{ConsumerSettings, LogSettings, ProducerSettings, SamplerSettings};

/// Sampler errors
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid buffer settings: {0}")]
    Buffer(#[from] history_buffer::ConfigError),
    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: String, reason: &'static str },
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Failed to spawn {name} thread: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} thread panicked")]
    WorkerPanicked(String),
}

/// Initialize logging
pub fn init_logging(settings: &LogSettings) -> Result<(), SamplerError> {
    let level: Level = settings.level.parse().map_err(|_| SamplerError::InvalidSetting {
        field: "log.level".to_string(),
        reason: "expected trace, debug, info, warn or error",
    })?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_names(true);

    let result = if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| SamplerError::Logging(e.to_string()))
}

fn spawn_worker<T, F>(name: &str, f: F) -> Result<JoinHandle<T>, SamplerError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .map_err(|source| SamplerError::Spawn {
            name: name.to_string(),
            source,
        })
}

fn join_worker<T>(name: &str, handle: JoinHandle<T>) -> Result<T, SamplerError> {
    handle
        .join()
        .map_err(|_| SamplerError::WorkerPanicked(name.to_string()))
}

/// Join every worker before surfacing the producer's outcome, so no
/// thread outlives a failed run
fn join_all<P, T>(
    produced: Result<P, SamplerError>,
    workers: Vec<(String, JoinHandle<T>)>,
) -> Result<(P, Vec<T>), SamplerError> {
    let joined: Vec<_> = workers
        .into_iter()
        .map(|(name, handle)| join_worker(&name, handle))
        .collect();

    let produced = produced?;
    let results = joined.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok((produced, results))
}

/// Run one producer and all configured consumers to completion
pub fn run(settings: &SamplerSettings) -> Result<Vec<ConsumerReport>, SamplerError> {
    settings.validate()?;

    let buffer = Arc::new(RingBuffer::try_from_config(&settings.buffer)?);
    let context = TimerContext::new();
    let stopwatch = Stopwatch::new();

    let mut consumers = Vec::with_capacity(settings.consumers.len());
    for consumer_settings in &settings.consumers {
        let name = consumer_settings.name.clone();
        let consumer = Consumer::new(consumer_settings.clone());
        let buffer = Arc::clone(&buffer);
        let worker_context = context.clone();

        match spawn_worker(&name, move || consumer.run(&buffer, &worker_context)) {
            Ok(handle) => consumers.push((name, handle)),
            Err(e) => {
                context.kill_all();
                return Err(e);
            }
        }
    }

    let producer = {
        let buffer = Arc::clone(&buffer);
        let worker_context = context.clone();
        let producer_settings = settings.producer.clone();
        spawn_worker("producer", move || {
            produce(&buffer, &worker_context, &producer_settings)
        })
    };

    // Consumers must be released even if the producer never ran
    let produced = producer.and_then(|handle| join_worker("producer", handle));
    context.kill_all();

    let (produced, reports) = join_all(produced, consumers)?;

    info!(
        "Run finished in {:.2}s: {} samples produced, base id {}",
        stopwatch.elapsed_secs(),
        produced,
        buffer.base_id()
    );

    Ok(reports)
}
