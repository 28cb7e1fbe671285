//! History Sampler - Main Entry Point

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use sampler::{init_logging, run, SamplerSettings};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config_path = env::var_os("SAMPLER_CONFIG").map(PathBuf::from);
    let settings = SamplerSettings::load(config_path.as_deref())
        .context("Failed to load sampler settings")?;

    init_logging(&settings.log).context("Failed to initialize logging")?;

    info!("=== History Sampler v{} ===", env!("CARGO_PKG_VERSION"));

    let reports = run(&settings).context("Sampler run failed")?;

    for report in &reports {
        info!(
            "{}: {} samples in {} batches, {} gaps ({} skipped), {} duplicates",
            report.name,
            report.received,
            report.batches,
            report.gaps,
            report.skipped,
            report.duplicates
        );
    }

    Ok(())
}
