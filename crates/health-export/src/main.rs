mod bootstrap;

use anyhow::{Context, Result};
use export_core::settings::Settings;
use export_data::pipeline::run_export;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("health-export v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, output directory: {}",
        settings.input.display(),
        settings.output_dir.display()
    );

    let config = settings.export_config();
    let summary = run_export(&config)
        .with_context(|| format!("converting {}", config.input_path.display()))?;

    for (category, count) in &summary.classified {
        tracing::info!("{}: {} records classified", category, count);
    }
    tracing::info!(
        "Skipped {} records ({} without value, {} non-numeric, {} unrecognised type)",
        summary.skipped.total(),
        summary.skipped.missing_value,
        summary.skipped.non_numeric_value,
        summary.skipped.unclassified_type
    );
    tracing::info!(
        "Wrote {} table(s) from {} records (load {:.2}s, transform {:.2}s)",
        summary.tables.len(),
        summary.records_read,
        summary.load_time_seconds,
        summary.transform_time_seconds
    );

    Ok(())
}
