use serde::Serialize;

use crate::catalog::{Category, MeasurementKind};

/// One `<Record>` element of the export, with only the attributes the
/// converter looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// The `type` attribute, e.g. `HKQuantityTypeIdentifierHeartRate`.
    pub record_type: Option<String>,
    /// The `startDate` attribute, e.g. `2024-01-15 08:00:00 +0900`.
    pub start_date: Option<String>,
    /// The `value` attribute.  Category samples and some metadata-only
    /// records have none.
    pub value: Option<String>,
}

impl RawRecord {
    pub fn new(
        record_type: impl Into<String>,
        start_date: impl Into<String>,
        value: Option<&str>,
    ) -> Self {
        Self {
            record_type: Some(record_type.into()),
            start_date: Some(start_date.into()),
            value: value.map(str::to_string),
        }
    }
}

/// A record whose type resolved to a [`MeasurementKind`] and whose value
/// parsed as a number.  The timestamp is still the raw export string.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub timestamp: String,
    pub kind: MeasurementKind,
    pub value: f64,
}

impl ClassifiedRecord {
    pub fn new(timestamp: impl Into<String>, kind: MeasurementKind, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            kind,
            value,
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }
}

/// A Nutrition record after daily aggregation.  At most one exists per
/// (target-zone calendar day, kind).
pub type AggregatedRecord = ClassifiedRecord;

/// One CSV row: `datetime,type,value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    /// Canonical `YYYY-MM-DD HH:MM:SS +0900` timestamp.
    pub datetime: String,
    #[serde(rename = "type")]
    pub label: &'static str,
    pub value: f64,
}

/// Classified records split by output table, each in input order.
#[derive(Debug, Clone, Default)]
pub struct CategorizedRecords {
    pub nutrition: Vec<ClassifiedRecord>,
    pub heart_rate: Vec<ClassifiedRecord>,
    pub walk: Vec<ClassifiedRecord>,
}

impl CategorizedRecords {
    pub fn get(&self, category: Category) -> &[ClassifiedRecord] {
        match category {
            Category::Nutrition => &self.nutrition,
            Category::HeartRate => &self.heart_rate,
            Category::Walk => &self.walk,
        }
    }

    /// Append `record` to the table its kind belongs to.
    pub fn push(&mut self, record: ClassifiedRecord) {
        match record.category() {
            Category::Nutrition => self.nutrition.push(record),
            Category::HeartRate => self.heart_rate.push(record),
            Category::Walk => self.walk.push(record),
        }
    }

    pub fn total(&self) -> usize {
        self.nutrition.len() + self.heart_rate.len() + self.walk.len()
    }
}
