//! Classification of raw export records.
//!
//! Health exports are noisy: category samples carry no value, some values are
//! not numbers, and most types are of no interest here.  All of those are
//! dropped without error.  Only the count of each kind of skip is kept.

use export_core::catalog::MeasurementKind;
use export_core::models::{CategorizedRecords, ClassifiedRecord, RawRecord};
use tracing::debug;

/// Why a raw record did not make it into any table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingValue,
    NonNumericValue,
    UnclassifiedType,
}

/// Per-reason skip tallies for one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub missing_value: usize,
    pub non_numeric_value: usize,
    pub unclassified_type: usize,
}

impl SkipCounts {
    fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::MissingValue => self.missing_value += 1,
            SkipReason::NonNumericValue => self.non_numeric_value += 1,
            SkipReason::UnclassifiedType => self.unclassified_type += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_value + self.non_numeric_value + self.unclassified_type
    }
}

/// Output of [`RecordExtractor::extract`].
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: CategorizedRecords,
    pub skipped: SkipCounts,
}

// ── RecordExtractor ───────────────────────────────────────────────────────────

/// Stateless filter/map from [`RawRecord`] to [`ClassifiedRecord`].
pub struct RecordExtractor;

impl RecordExtractor {
    /// Classify every record, keeping input order within each category.
    pub fn extract(records: &[RawRecord]) -> Extraction {
        Self::extract_with(records, |_| {})
    }

    /// Like [`RecordExtractor::extract`], calling `on_record` with the index
    /// of each raw record once it has been handled.
    pub fn extract_with(records: &[RawRecord], mut on_record: impl FnMut(usize)) -> Extraction {
        let mut extraction = Extraction::default();

        for (index, raw) in records.iter().enumerate() {
            match Self::classify(raw) {
                Ok(record) => extraction.records.push(record),
                Err(reason) => extraction.skipped.record(reason),
            }
            on_record(index);
        }

        debug!(
            "Classified {} of {} records ({} skipped)",
            extraction.records.total(),
            records.len(),
            extraction.skipped.total()
        );

        extraction
    }

    /// Classify a single record.
    ///
    /// Checks run in order: value present, value numeric, type recognised.
    /// A recognised record without a `startDate` keeps an empty timestamp,
    /// which is rejected later when timestamps are normalized.
    pub fn classify(raw: &RawRecord) -> Result<ClassifiedRecord, SkipReason> {
        let value = raw.value.as_deref().ok_or(SkipReason::MissingValue)?;
        let value = parse_value(value).ok_or(SkipReason::NonNumericValue)?;
        let kind = raw
            .record_type
            .as_deref()
            .and_then(MeasurementKind::classify)
            .ok_or(SkipReason::UnclassifiedType)?;

        let timestamp = raw.start_date.clone().unwrap_or_default();
        Ok(ClassifiedRecord::new(timestamp, kind, value))
    }
}

/// Float coercion: surrounding whitespace is ignored.
fn parse_value(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use export_core::catalog::Category;

    fn raw(record_type: &str, value: Option<&str>) -> RawRecord {
        RawRecord::new(record_type, "2024-01-15 08:00:00 +0900", value)
    }

    #[test]
    fn test_classify_numeric_record() {
        let record =
            RecordExtractor::classify(&raw("HKQuantityTypeIdentifierHeartRate", Some("72")))
                .unwrap();
        assert_eq!(record.kind, MeasurementKind::HeartRate);
        assert_eq!(record.label(), "心拍数");
        assert_eq!(record.value, 72.0);
        assert_eq!(record.timestamp, "2024-01-15 08:00:00 +0900");
    }

    #[test]
    fn test_classify_missing_value() {
        let result = RecordExtractor::classify(&raw("HKQuantityTypeIdentifierHeartRate", None));
        assert_eq!(result, Err(SkipReason::MissingValue));
    }

    #[test]
    fn test_classify_non_numeric_value() {
        for value in ["", "abc", "HKCategoryValueSleepAnalysisAsleep", "1,5"] {
            let result = RecordExtractor::classify(&raw(
                "HKQuantityTypeIdentifierBodyMass",
                Some(value),
            ));
            assert_eq!(result, Err(SkipReason::NonNumericValue), "value {value:?}");
        }
    }

    #[test]
    fn test_classify_tolerates_whitespace_and_exponent() {
        let record = RecordExtractor::classify(&raw(
            "HKQuantityTypeIdentifierWalkingSpeed",
            Some(" 4.5 "),
        ))
        .unwrap();
        assert_eq!(record.value, 4.5);

        let record = RecordExtractor::classify(&raw(
            "HKQuantityTypeIdentifierDietaryEnergyConsumed",
            Some("1.2e3"),
        ))
        .unwrap();
        assert_eq!(record.value, 1200.0);
    }

    #[test]
    fn test_classify_unclassified_type() {
        let result =
            RecordExtractor::classify(&raw("HKQuantityTypeIdentifierStepCount", Some("100")));
        assert_eq!(result, Err(SkipReason::UnclassifiedType));

        let missing_type = RawRecord {
            record_type: None,
            start_date: Some("2024-01-15".to_string()),
            value: Some("1".to_string()),
        };
        assert_eq!(
            RecordExtractor::classify(&missing_type),
            Err(SkipReason::UnclassifiedType)
        );
    }

    #[test]
    fn test_classify_missing_start_date_keeps_empty_timestamp() {
        let record = RawRecord {
            record_type: Some("HKQuantityTypeIdentifierHeartRate".to_string()),
            start_date: None,
            value: Some("60".to_string()),
        };
        let classified = RecordExtractor::classify(&record).unwrap();
        assert_eq!(classified.timestamp, "");
    }

    #[test]
    fn test_extract_partitions_and_preserves_order() {
        let records = vec![
            raw("HKQuantityTypeIdentifierHeartRate", Some("70")),
            raw("HKQuantityTypeIdentifierBodyMass", Some("70.5")),
            raw("HKQuantityTypeIdentifierStepCount", Some("5000")),
            raw("HKQuantityTypeIdentifierHeartRate", Some("71")),
            raw("HKQuantityTypeIdentifierWalkingStepLength", Some("65")),
            raw("HKQuantityTypeIdentifierRestingHeartRate", None),
            raw("HKQuantityTypeIdentifierDietaryProtein", Some("n/a")),
            raw("HKQuantityTypeIdentifierHeartRate", Some("69")),
        ];

        let extraction = RecordExtractor::extract(&records);

        let heart: Vec<f64> = extraction
            .records
            .get(Category::HeartRate)
            .iter()
            .map(|r| r.value)
            .collect();
        assert_eq!(heart, vec![70.0, 71.0, 69.0]);
        assert_eq!(extraction.records.get(Category::Nutrition).len(), 1);
        assert_eq!(extraction.records.get(Category::Walk).len(), 1);

        assert_eq!(
            extraction.skipped,
            SkipCounts {
                missing_value: 1,
                non_numeric_value: 1,
                unclassified_type: 1,
            }
        );
        assert_eq!(
            extraction.records.total() + extraction.skipped.total(),
            records.len()
        );
    }

    #[test]
    fn test_extract_with_calls_observer_per_record() {
        let records = vec![
            raw("HKQuantityTypeIdentifierHeartRate", Some("70")),
            raw("Unknown", Some("1")),
            raw("HKQuantityTypeIdentifierHeartRate", None),
        ];
        let mut seen = Vec::new();
        RecordExtractor::extract_with(&records, |i| seen.push(i));
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_extract_empty() {
        let extraction = RecordExtractor::extract(&[]);
        assert_eq!(extraction.records.total(), 0);
        assert_eq!(extraction.skipped.total(), 0);
    }
}
