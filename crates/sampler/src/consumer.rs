//! Polling consumer

use history_buffer::RingBuffer;
use loop_timer::{LoopTimer, TimerContext};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::sample::Sample;
use crate::settings::ConsumerSettings;

/// What one consumer received over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsumerReport {
    pub name: String,
    /// Samples received
    pub received: u64,
    /// Non-empty polls
    pub batches: u64,
    /// Discontinuities in the sequence numbers
    pub gaps: u64,
    /// Samples lost in those discontinuities
    pub skipped: u64,
    /// Samples received more than once or out of order
    pub duplicates: u64,
    pub first_sequence: Option<u64>,
    pub last_sequence: Option<u64>,
}

/// Consumer holding its own cursor into the shared buffer
pub struct Consumer {
    settings: ConsumerSettings,
    cursor: u64,
    report: ConsumerReport,
}

impl Consumer {
    /// Create a consumer that has not read anything yet
    pub fn new(settings: ConsumerSettings) -> Self {
        let report = ConsumerReport {
            name: settings.name.clone(),
            ..Default::default()
        };
        Self {
            settings,
            cursor: 0,
            report,
        }
    }

    /// Read the next window and account for it. Returns the batch size.
    pub fn poll(&mut self, buffer: &RingBuffer<Sample>) -> usize {
        let batch = buffer.get_window(
            self.settings.amount,
            &mut self.cursor,
            self.settings.mode,
            self.settings.exact,
        );
        self.record(&batch);
        batch.len()
    }

    fn record(&mut self, batch: &[Sample]) {
        if batch.is_empty() {
            return;
        }

        let report = &mut self.report;
        for sample in batch {
            match report.last_sequence {
                Some(last) if sample.sequence <= last => report.duplicates += 1,
                Some(last) if sample.sequence > last + 1 => {
                    report.gaps += 1;
                    report.skipped += sample.sequence - last - 1;
                }
                _ => {}
            }
            report.first_sequence.get_or_insert(sample.sequence);
            report.last_sequence = Some(sample.sequence);
        }

        report.received += batch.len() as u64;
        report.batches += 1;

        debug!(
            consumer = %report.name,
            len = batch.len(),
            first = batch[0].sequence,
            cursor = self.cursor,
            "Received batch"
        );
    }

    /// Poll on every tick until the context is killed, then drain what is left
    pub fn run(mut self, buffer: &RingBuffer<Sample>, context: &TimerContext) -> ConsumerReport {
        info!(
            "Consumer {} polling {} samples every {} ms ({:?}, exact: {})",
            self.settings.name,
            self.settings.amount,
            self.settings.interval_ms,
            self.settings.mode,
            self.settings.exact
        );

        let mut timer = LoopTimer::from_millis(context, self.settings.interval_ms, false);
        while timer.wait_on_tick() {
            self.poll(buffer);
        }

        while self.poll(buffer) > 0 {}

        if self.report.gaps > 0 {
            warn!(
                "Consumer {} skipped {} samples in {} gaps",
                self.report.name, self.report.skipped, self.report.gaps
            );
        }

        self.report
    }

    /// Report so far
    pub fn report(&self) -> &ConsumerReport {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use history_buffer::ReadMode;

    fn buffer_with(capacity: usize, samples: std::ops::Range<u64>) -> RingBuffer<Sample> {
        let buffer = RingBuffer::new(capacity);
        buffer.insert_many(samples.map(Sample::synthetic));
        buffer
    }

    #[test]
    fn test_continuous_consumer_has_no_gaps() {
        let buffer = buffer_with(32, 0..3);
        let mut consumer = Consumer::new(ConsumerSettings::new("c", 4, ReadMode::Continuous, 10));

        assert_eq!(consumer.poll(&buffer), 3);
        buffer.insert_many((3..20).map(Sample::synthetic));
        while consumer.poll(&buffer) > 0 {}

        let report = consumer.report();
        assert_eq!(report.received, 20);
        assert_eq!(report.batches, 6);
        assert_eq!(report.gaps, 0);
        assert_eq!(report.duplicates, 0);
        assert_eq!(report.first_sequence, Some(0));
        assert_eq!(report.last_sequence, Some(19));
    }

    #[test]
    fn test_windowed_consumer_counts_skipped() {
        let buffer = buffer_with(32, 0..3);
        let mut consumer = Consumer::new(ConsumerSettings::new("w", 4, ReadMode::Windowed, 10));

        consumer.poll(&buffer);
        buffer.insert_many((3..20).map(Sample::synthetic));
        consumer.poll(&buffer);

        let report = consumer.report();
        assert_eq!(report.received, 7);
        assert_eq!(report.gaps, 1);
        assert_eq!(report.skipped, 13);
        assert_eq!(report.last_sequence, Some(19));
    }

    #[test]
    fn test_exact_consumer_waits_for_full_batch() {
        let buffer = buffer_with(32, 0..3);
        let settings = ConsumerSettings {
            exact: true,
            ..ConsumerSettings::new("e", 4, ReadMode::Continuous, 10)
        };
        let mut consumer = Consumer::new(settings);

        assert_eq!(consumer.poll(&buffer), 0);
        buffer.insert(Sample::synthetic(3));
        assert_eq!(consumer.poll(&buffer), 4);
        assert_eq!(consumer.report().batches, 1);
    }

    #[test]
    fn test_replayed_samples_count_as_duplicates() {
        let mut consumer = Consumer::new(ConsumerSettings::new("d", 4, ReadMode::Windowed, 10));
        consumer.record(&[Sample::synthetic(5), Sample::synthetic(6)]);
        consumer.record(&[Sample::synthetic(6)]);

        assert_eq!(consumer.report().duplicates, 1);
        assert_eq!(consumer.report().received, 3);
    }
}
