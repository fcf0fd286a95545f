use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use tracing::debug;

use crate::error::{ExportError, Result};

/// Offset of the output zone (JST).  Fixed; no daylight-saving rules apply.
pub const TARGET_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// Output format, e.g. `2024-01-15 08:00:00 +0900`.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Date-time patterns that carry their own UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Patterns without an offset; these are read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

// ── TimestampNormalizer ───────────────────────────────────────────────────────

/// Parses export timestamps and re-expresses them in the output zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampNormalizer {
    target: FixedOffset,
}

impl Default for TimestampNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampNormalizer {
    /// Normalizer targeting UTC+9.
    pub fn new() -> Self {
        let target = FixedOffset::east_opt(TARGET_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
        Self { target }
    }

    /// Normalizer targeting an arbitrary fixed offset, in seconds east of UTC.
    pub fn with_offset_seconds(secs: i32) -> Result<Self> {
        let target = FixedOffset::east_opt(secs)
            .ok_or_else(|| ExportError::Config(format!("UTC offset out of range: {}s", secs)))?;
        Ok(Self { target })
    }

    pub fn target(&self) -> FixedOffset {
        self.target
    }

    /// Parse a timestamp string into an absolute instant.
    ///
    /// Strings with an explicit offset (`+0900`, `+09:00`, `Z`) are converted
    /// to UTC using that offset.  Strings without one are taken to already be
    /// UTC.  A bare date is midnight UTC.
    pub fn parse_instant(&self, s: &str) -> Result<DateTime<Utc>> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ExportError::TimestampParse(s.to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.with_timezone(&Utc));
        }

        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
                return Ok(dt.with_timezone(&Utc));
            }
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                debug!("Timestamp \"{}\" has no offset; assuming UTC", trimmed);
                return Ok(Utc.from_utc_datetime(&naive));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(Utc.from_utc_datetime(&naive));
            }
        }

        Err(ExportError::TimestampParse(s.to_string()))
    }

    /// Express `dt` in the target zone.
    pub fn to_target(&self, dt: DateTime<Utc>) -> DateTime<FixedOffset> {
        dt.with_timezone(&self.target)
    }

    /// Format an instant in canonical form in the target zone.
    pub fn format(&self, dt: DateTime<Utc>) -> String {
        self.to_target(dt).format(CANONICAL_FORMAT).to_string()
    }

    /// Parse `s` and format it canonically in the target zone.
    pub fn normalize(&self, s: &str) -> Result<String> {
        Ok(self.format(self.parse_instant(s)?))
    }

    /// Calendar date of `s` as seen in the target zone.
    pub fn local_date(&self, s: &str) -> Result<NaiveDate> {
        Ok(self.to_target(self.parse_instant(s)?).date_naive())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
