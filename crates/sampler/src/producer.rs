//! Sample producer

use history_buffer::RingBuffer;
use loop_timer::{LoopTimer, TimerContext};
use tracing::{info, trace};

use crate::sample::Sample;
use crate::settings::ProducerSettings;

/// Insert one synthetic sample per tick, then stop every timer in `context`.
///
/// Returns the number of samples inserted.
pub fn produce(buffer: &RingBuffer<Sample>, context: &TimerContext, settings: &ProducerSettings) -> u64 {
    info!(
        "Producing {} samples every {} ms",
        settings.samples, settings.interval_ms
    );

    let mut timer = LoopTimer::from_millis(context, settings.interval_ms, true);
    let mut produced = 0;

    while produced < settings.samples && timer.wait_on_tick() {
        let sample = Sample::synthetic(produced);
        trace!(sequence = sample.sequence, value = sample.value, "Inserting sample");
        buffer.insert(sample);
        produced += 1;
    }

    info!(
        "Producer finished after {} samples (buffer {}/{})",
        produced,
        buffer.size(),
        buffer.capacity()
    );
    context.kill_all();
    produced
}
