//! Same-day collapsing of Nutrition records.
//!
//! Records are grouped by calendar day in the target zone, then by
//! measurement kind.  Each (day, kind) group becomes exactly one record,
//! following the kind's [`DailyRule`].

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use export_core::catalog::{DailyRule, MeasurementKind};
use export_core::error::Result;
use export_core::models::{AggregatedRecord, ClassifiedRecord};
use export_core::time_utils::TimestampNormalizer;
use tracing::{debug, trace};

/// A record paired with its parsed instant, so each timestamp is parsed once.
struct Sample<'a> {
    record: &'a ClassifiedRecord,
    instant: DateTime<Utc>,
}

type DayGroups<'a> = BTreeMap<NaiveDate, BTreeMap<MeasurementKind, Vec<Sample<'a>>>>;

// ── DailyAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that collapses same-day records.
pub struct DailyAggregator;

impl DailyAggregator {
    /// Collapse `records` to at most one record per (day, kind).
    ///
    /// Returns records ordered by day, then by kind in table order.  Fails
    /// only when a timestamp cannot be parsed.
    pub fn aggregate(
        records: &[ClassifiedRecord],
        normalizer: &TimestampNormalizer,
    ) -> Result<Vec<AggregatedRecord>> {
        let groups = Self::group_by_day(records, normalizer)?;

        let mut aggregated: Vec<AggregatedRecord> = Vec::new();
        for (date, kinds) in &groups {
            for (kind, samples) in kinds {
                let collapsed = match kind.daily_rule() {
                    DailyRule::Max => Self::collapse_max(samples),
                    DailyRule::Sum => Self::collapse_sum(samples),
                };
                if let Some(record) = collapsed {
                    trace!(
                        "{} {}: {} record(s) -> {}",
                        date,
                        kind,
                        samples.len(),
                        record.value
                    );
                    aggregated.push(record);
                }
            }
        }

        debug!(
            "Aggregated {} records into {} daily rows over {} day(s)",
            records.len(),
            aggregated.len(),
            groups.len()
        );

        Ok(aggregated)
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Two-level grouping: target-zone date, then kind.  Input order is kept
    /// inside each group.
    fn group_by_day<'a>(
        records: &'a [ClassifiedRecord],
        normalizer: &TimestampNormalizer,
    ) -> Result<DayGroups<'a>> {
        let mut groups: DayGroups<'a> = BTreeMap::new();

        for record in records {
            let instant = normalizer.parse_instant(&record.timestamp)?;
            let date = normalizer.to_target(instant).date_naive();
            groups
                .entry(date)
                .or_default()
                .entry(record.kind)
                .or_default()
                .push(Sample { record, instant });
        }

        Ok(groups)
    }

    /// Largest value, stamped with its own timestamp.  The first of several
    /// equal maxima wins.
    fn collapse_max(samples: &[Sample<'_>]) -> Option<AggregatedRecord> {
        let mut best: Option<&Sample<'_>> = None;
        for sample in samples {
            best = match best {
                Some(current) if !exceeds(sample.record.value, current.record.value) => {
                    Some(current)
                }
                _ => Some(sample),
            };
        }

        best.map(|s| AggregatedRecord::new(s.record.timestamp.clone(), s.record.kind, s.record.value))
    }

    /// Sum of values, stamped with the timestamp of the latest instant.  The
    /// first of several equal instants wins.  NaN values add nothing.
    fn collapse_sum(samples: &[Sample<'_>]) -> Option<AggregatedRecord> {
        let mut latest: Option<&Sample<'_>> = None;
        for sample in samples {
            latest = match latest {
                Some(current) if sample.instant <= current.instant => Some(current),
                _ => Some(sample),
            };
        }

        let total: f64 = samples
            .iter()
            .map(|s| s.record.value)
            .filter(|v| !v.is_nan())
            .sum();

        latest.map(|s| AggregatedRecord::new(s.record.timestamp.clone(), s.record.kind, total))
    }
}

/// Whether `candidate` should replace `current` as the maximum.  A number
/// always beats NaN.
fn exceeds(candidate: f64, current: f64) -> bool {
    if current.is_nan() {
        !candidate.is_nan()
    } else {
        candidate > current
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use export_core::error::ExportError;

    fn rec(ts: &str, kind: MeasurementKind, value: f64) -> ClassifiedRecord {
        ClassifiedRecord::new(ts, kind, value)
    }

    fn aggregate(records: &[ClassifiedRecord]) -> Vec<AggregatedRecord> {
        DailyAggregator::aggregate(records, &TimestampNormalizer::new()).unwrap()
    }

    // ── sum rule ──────────────────────────────────────────────────────────────

    #[test]
    fn test_sum_uses_latest_timestamp() {
        let records = vec![
            rec("2024-01-15 08:00:00 +0900", MeasurementKind::DietaryEnergyConsumed, 200.0),
            rec("2024-01-15 12:30:00 +0900", MeasurementKind::DietaryEnergyConsumed, 150.0),
        ];
        let out = aggregate(&records);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label(), "摂取カロリー");
        assert_eq!(out[0].value, 350.0);
        assert_eq!(out[0].timestamp, "2024-01-15 12:30:00 +0900");
    }

    #[test]
    fn test_sum_latest_is_by_instant_not_input_order() {
        let records = vec![
            rec("2024-01-15 21:00:00 +0900", MeasurementKind::DietaryProtein, 10.0),
            rec("2024-01-15 09:00:00 +0900", MeasurementKind::DietaryProtein, 20.0),
            // 01:00 UTC is 10:00 JST: later in input, earlier in time.
            rec("2024-01-15 01:00:00 +0000", MeasurementKind::DietaryProtein, 5.0),
        ];
        let out = aggregate(&records);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, 35.0);
        assert_eq!(out[0].timestamp, "2024-01-15 21:00:00 +0900");
    }

    #[test]
    fn test_sum_tied_latest_keeps_first() {
        let records = vec![
            rec("2024-01-15 12:00:00 +0900", MeasurementKind::DietaryFatTotal, 1.0),
            rec("2024-01-15 03:00:00 +0000", MeasurementKind::DietaryFatTotal, 2.0),
        ];
        let out = aggregate(&records);

        assert_eq!(out[0].value, 3.0);
        assert_eq!(out[0].timestamp, "2024-01-15 12:00:00 +0900");
    }

    #[test]
    fn test_sum_ignores_nan() {
        let records = vec![
            rec("2024-01-15 08:00:00 +0900", MeasurementKind::ActiveEnergyBurned, 10.0),
            rec("2024-01-15 09:00:00 +0900", MeasurementKind::ActiveEnergyBurned, f64::NAN),
        ];
        let out = aggregate(&records);
        assert_eq!(out[0].value, 10.0);
    }

    // ── max rule ──────────────────────────────────────────────────────────────

    #[test]
    fn test_max_keeps_its_own_timestamp() {
        let records = vec![
            rec("2024-01-15 07:00:00 +0900", MeasurementKind::BodyMass, 70.5),
            rec("2024-01-15 20:00:00 +0900", MeasurementKind::BodyMass, 70.2),
        ];
        let out = aggregate(&records);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label(), "体重");
        assert_eq!(out[0].value, 70.5);
        assert_eq!(out[0].timestamp, "2024-01-15 07:00:00 +0900");
    }

    #[test]
    fn test_max_tie_keeps_first_occurrence() {
        let records = vec![
            rec("2024-01-15 20:00:00 +0900", MeasurementKind::BodyMass, 70.0),
            rec("2024-01-15 07:00:00 +0900", MeasurementKind::BodyMass, 70.0),
        ];
        let out = aggregate(&records);
        assert_eq!(out[0].timestamp, "2024-01-15 20:00:00 +0900");
    }

    #[test]
    fn test_max_number_beats_nan() {
        let records = vec![
            rec("2024-01-15 07:00:00 +0900", MeasurementKind::BodyMass, f64::NAN),
            rec("2024-01-15 08:00:00 +0900", MeasurementKind::BodyMass, 69.0),
        ];
        let out = aggregate(&records);
        assert_eq!(out[0].value, 69.0);
        assert_eq!(out[0].timestamp, "2024-01-15 08:00:00 +0900");
    }

    // ── grouping ──────────────────────────────────────────────────────────────

    #[test]
    fn test_groups_by_target_zone_date() {
        let records = vec![
            // 2024-01-15 20:00 UTC is 2024-01-16 05:00 JST.
            rec("2024-01-15 20:00:00 +0000", MeasurementKind::DietaryCarbohydrates, 30.0),
            rec("2024-01-16 12:00:00 +0900", MeasurementKind::DietaryCarbohydrates, 40.0),
            rec("2024-01-15 12:00:00 +0900", MeasurementKind::DietaryCarbohydrates, 50.0),
        ];
        let out = aggregate(&records);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].value, 50.0);
        assert_eq!(out[0].timestamp, "2024-01-15 12:00:00 +0900");
        assert_eq!(out[1].value, 70.0);
        assert_eq!(out[1].timestamp, "2024-01-16 12:00:00 +0900");
    }

    #[test]
    fn test_one_row_per_day_and_kind() {
        let records = vec![
            rec("2024-01-15 07:00:00 +0900", MeasurementKind::BodyMass, 70.0),
            rec("2024-01-15 08:00:00 +0900", MeasurementKind::DietaryEnergyConsumed, 300.0),
            rec("2024-01-15 19:00:00 +0900", MeasurementKind::DietaryEnergyConsumed, 700.0),
            rec("2024-01-15 23:00:00 +0900", MeasurementKind::BasalEnergyBurned, 1500.0),
            // Day without a body-mass reading.
            rec("2024-01-16 08:00:00 +0900", MeasurementKind::DietaryEnergyConsumed, 400.0),
        ];
        let out = aggregate(&records);

        let summary: Vec<(&str, &str, f64)> = out
            .iter()
            .map(|r| (&r.timestamp[..10], r.label(), r.value))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("2024-01-15", "基礎代謝", 1500.0),
                ("2024-01-15", "体重", 70.0),
                ("2024-01-15", "摂取カロリー", 1000.0),
                ("2024-01-16", "摂取カロリー", 400.0),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_unparseable_timestamp_is_error() {
        let records = vec![rec("last tuesday", MeasurementKind::BodyMass, 70.0)];
        let err = DailyAggregator::aggregate(&records, &TimestampNormalizer::new()).unwrap_err();
        assert!(matches!(err, ExportError::TimestampParse(_)));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let records = vec![
            rec("2024-01-15 08:00:00 +0900", MeasurementKind::DietaryProtein, 1.0),
            rec("2024-01-15 09:00:00 +0900", MeasurementKind::DietaryProtein, 2.0),
        ];
        let before = records.clone();
        let _ = aggregate(&records);
        assert_eq!(records, before);
    }
}
