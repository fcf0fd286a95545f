//! Export document loading.
//!
//! Reads `export.xml` into memory and collects the direct `<Record>` children
//! of the `<HealthData>` root as [`RawRecord`]s.  Records nested deeper (for
//! example inside `<Correlation>`) are not top-level samples and are skipped.

use std::path::Path;

use export_core::error::{ExportError, Result};
use export_core::models::RawRecord;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

/// Name of the document root.
pub const ROOT_ELEMENT: &str = "HealthData";

const RECORD_ELEMENT: &[u8] = b"Record";

// ── Public API ────────────────────────────────────────────────────────────────

/// Read and parse the export at `path`.
pub fn load_export(path: &Path) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| ExportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Read {} bytes from {}",
        content.len(),
        path.display()
    );

    let records = parse_export(&content)?;
    if records.is_empty() {
        warn!("No <Record> elements found in {}", path.display());
    }
    Ok(records)
}

/// Parse an in-memory export document.
///
/// Fails when the XML is malformed or the root element is not
/// `<HealthData>`.  Record attributes are taken as-is; nothing beyond XML
/// well-formedness is validated here.
pub fn parse_export(xml: &str) -> Result<Vec<RawRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut records: Vec<RawRecord> = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            ExportError::XmlParse(format!("at byte {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Start(element) => {
                if depth == 0 {
                    check_root(&element)?;
                    seen_root = true;
                } else if depth == 1 && element.name().as_ref() == RECORD_ELEMENT {
                    records.push(read_record(&element)?);
                }
                depth += 1;
            }
            Event::Empty(element) => {
                if depth == 0 {
                    check_root(&element)?;
                    seen_root = true;
                } else if depth == 1 && element.name().as_ref() == RECORD_ELEMENT {
                    records.push(read_record(&element)?);
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(ExportError::MissingRoot(ROOT_ELEMENT.to_string()));
    }
    if depth != 0 {
        return Err(ExportError::XmlParse(format!(
            "document ended with {} unclosed element(s)",
            depth
        )));
    }

    debug!("Parsed {} top-level records", records.len());
    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn check_root(element: &BytesStart<'_>) -> Result<()> {
    if element.name().as_ref() == ROOT_ELEMENT.as_bytes() {
        Ok(())
    } else {
        Err(ExportError::MissingRoot(ROOT_ELEMENT.to_string()))
    }
}

/// Pull `type`, `startDate` and `value` out of a `<Record>` start tag.
fn read_record(element: &BytesStart<'_>) -> Result<RawRecord> {
    let mut record = RawRecord::default();

    for attr in element.attributes() {
        let attr = attr.map_err(|e| ExportError::XmlParse(e.to_string()))?;
        let slot = match attr.key.as_ref() {
            b"type" => &mut record.record_type,
            b"startDate" => &mut record.start_date,
            b"value" => &mut record.value,
            _ => continue,
        };
        let value = attr
            .unescape_value()
            .map_err(|e| ExportError::XmlParse(e.to_string()))?;
        *slot = Some(value.into_owned());
    }

    Ok(record)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
