//! Table emission: timestamp normalization, ordering and CSV output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use export_core::error::{ExportError, Result};
use export_core::models::{ClassifiedRecord, OutputRow};
use export_core::time_utils::TimestampNormalizer;
use tracing::debug;

/// Byte-order mark written ahead of the header so spreadsheet tools detect
/// UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column names, in output order.
pub const HEADER: [&str; 3] = ["datetime", "type", "value"];

// ── TableEmitter ──────────────────────────────────────────────────────────────

pub struct TableEmitter;

impl TableEmitter {
    /// Normalize every timestamp and order rows by it.
    ///
    /// The canonical format is fixed-width, so ordering the strings orders
    /// the instants.  The sort is stable: rows with the same timestamp keep
    /// their input order.
    pub fn prepare_rows(
        records: &[ClassifiedRecord],
        normalizer: &TimestampNormalizer,
    ) -> Result<Vec<OutputRow>> {
        let mut rows = records
            .iter()
            .map(|record| {
                Ok(OutputRow {
                    datetime: normalizer.normalize(&record.timestamp)?,
                    label: record.label(),
                    value: record.value,
                })
            })
            .collect::<Result<Vec<OutputRow>>>()?;

        rows.sort_by(|a, b| a.datetime.cmp(&b.datetime));
        Ok(rows)
    }

    /// Write BOM, header and rows to `writer`.
    pub fn write_rows<W: Write>(rows: &[OutputRow], mut writer: W) -> Result<()> {
        writer.write_all(UTF8_BOM)?;

        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        csv_writer.write_record(HEADER)?;
        for row in rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write a table to `path`.
    ///
    /// Output goes to a temporary sibling first and is renamed into place,
    /// so a failed run never leaves a truncated table behind.
    pub fn write_table(rows: &[OutputRow], path: &Path) -> Result<()> {
        let tmp = path.with_extension("csv.tmp");

        let file = File::create(&tmp).map_err(|source| ExportError::FileWrite {
            path: tmp.clone(),
            source,
        })?;
        if let Err(e) = Self::write_rows(rows, BufWriter::new(file)) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }

        std::fs::rename(&tmp, path).map_err(|source| ExportError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
