//! Main conversion pipeline.
//!
//! Loads the export, classifies records, collapses Nutrition days, and writes
//! one CSV table per non-empty category, returning an [`ExportSummary`].

use std::path::PathBuf;
use std::time::Instant;

use export_core::catalog::Category;
use export_core::error::Result;
use export_core::models::{CategorizedRecords, ClassifiedRecord, OutputRow, RawRecord};
use export_core::settings::ExportConfig;
use export_core::time_utils::TimestampNormalizer;
use tracing::{debug, info};

use crate::aggregator::DailyAggregator;
use crate::extractor::{RecordExtractor, SkipCounts};
use crate::progress::record_progress_bar;
use crate::reader::load_export;
use crate::writer::TableEmitter;

// ── Public types ──────────────────────────────────────────────────────────────

/// One table written by [`run_export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub category: Category,
    pub path: PathBuf,
    pub rows: usize,
}

/// Outcome of a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Top-level `<Record>` elements read from the export.
    pub records_read: usize,
    /// Records that survived classification, per category.
    pub classified: Vec<(Category, usize)>,
    pub skipped: SkipCounts,
    /// Tables written, in category order.  Empty categories are absent.
    pub tables: Vec<WrittenTable>,
    /// Wall-clock seconds spent reading and parsing the export.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent classifying, aggregating and writing.
    pub transform_time_seconds: f64,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full conversion described by `config`.
///
/// 1. Check the output directory.
/// 2. Load `<Record>` elements from the export.
/// 3. Classify them into categories (with a progress bar).
/// 4. Build every non-empty table; Nutrition is aggregated per day first.
/// 5. Write the tables.
///
/// All tables are built before any is written, so a bad timestamp anywhere
/// aborts the run without touching the output directory.
pub fn run_export(config: &ExportConfig) -> Result<ExportSummary> {
    config.validate()?;

    let load_start = Instant::now();
    let raw_records = load_export(config.input_path())?;
    let load_time_seconds = load_start.elapsed().as_secs_f64();
    info!(
        "Loaded {} records from {} in {:.2}s",
        raw_records.len(),
        config.input_path().display(),
        load_time_seconds
    );

    let transform_start = Instant::now();
    let progress = record_progress_bar(raw_records.len() as u64, config.show_progress);
    let extraction = RecordExtractor::extract_with(&raw_records, |_| progress.inc(1));
    progress.finish();

    let tables = build_tables(&extraction.records, &TimestampNormalizer::new())?;

    let mut written: Vec<WrittenTable> = Vec::new();
    for (category, rows) in tables {
        let path = config.output_path(category);
        TableEmitter::write_table(&rows, &path)?;
        info!("Wrote {} {} rows to {}", rows.len(), category, path.display());
        if config.show_progress {
            println!("{} を作成しました！", category.file_name());
        }
        written.push(WrittenTable {
            category,
            path,
            rows: rows.len(),
        });
    }

    Ok(ExportSummary {
        records_read: raw_records.len(),
        classified: Category::ALL
            .iter()
            .map(|&c| (c, extraction.records.get(c).len()))
            .collect(),
        skipped: extraction.skipped,
        tables: written,
        load_time_seconds,
        transform_time_seconds: transform_start.elapsed().as_secs_f64(),
    })
}

/// In-memory conversion of already-loaded records: classification,
/// aggregation and row preparation, without touching the filesystem.
pub fn convert_records(raw_records: &[RawRecord]) -> Result<Vec<(Category, Vec<OutputRow>)>> {
    let extraction = RecordExtractor::extract(raw_records);
    build_tables(&extraction.records, &TimestampNormalizer::new())
}

/// Rows for one category's table.
pub fn build_table(
    category: Category,
    records: &[ClassifiedRecord],
    normalizer: &TimestampNormalizer,
) -> Result<Vec<OutputRow>> {
    if category.is_daily_aggregated() {
        let aggregated = DailyAggregator::aggregate(records, normalizer)?;
        TableEmitter::prepare_rows(&aggregated, normalizer)
    } else {
        TableEmitter::prepare_rows(records, normalizer)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn build_tables(
    records: &CategorizedRecords,
    normalizer: &TimestampNormalizer,
) -> Result<Vec<(Category, Vec<OutputRow>)>> {
    let mut tables = Vec::new();
    for category in Category::ALL {
        let category_records = records.get(category);
        if category_records.is_empty() {
            debug!("No {} records; skipping {}", category, category.file_name());
            continue;
        }
        let rows = build_table(category, category_records, normalizer)?;
        tables.push((category, rows));
    }
    Ok(tables)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
