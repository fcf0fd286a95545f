//! Fixed classification of HealthKit quantity types.
//!
//! Every recognised type identifier maps to exactly one [`MeasurementKind`],
//! which carries its output [`Category`], its Japanese display label and the
//! rule used when same-day records are collapsed.

use std::fmt;

// ── Category ──────────────────────────────────────────────────────────────────

/// One output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Nutrition,
    HeartRate,
    Walk,
}

impl Category {
    /// All categories in output order.
    pub const ALL: [Category; 3] = [Category::Nutrition, Category::HeartRate, Category::Walk];

    /// File name of the table written for this category.
    pub fn file_name(&self) -> &'static str {
        match self {
            Category::Nutrition => "healthcare_nutrition.csv",
            Category::HeartRate => "healthcare_heartrate.csv",
            Category::Walk => "healthcare_walk.csv",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Nutrition => "nutrition",
            Category::HeartRate => "heartrate",
            Category::Walk => "walk",
        }
    }

    /// Whether same-day records of this category are collapsed before output.
    pub fn is_daily_aggregated(&self) -> bool {
        matches!(self, Category::Nutrition)
    }

    /// Measurement kinds that belong to this category, in table order.
    pub fn kinds(&self) -> impl Iterator<Item = MeasurementKind> + '_ {
        MeasurementKind::ALL
            .into_iter()
            .filter(move |kind| kind.category() == *self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DailyRule ─────────────────────────────────────────────────────────────────

/// How one (day, label) group of records collapses into a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyRule {
    /// Keep the record holding the largest value.
    Max,
    /// Sum the values, stamped with the latest record's timestamp.
    Sum,
}

// ── MeasurementKind ───────────────────────────────────────────────────────────

/// A recognised quantity type.
///
/// Variant order is the order rows for the same day are aggregated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeasurementKind {
    ActiveEnergyBurned,
    BasalEnergyBurned,
    BodyMass,
    DietaryEnergyConsumed,
    DietaryFatTotal,
    DietaryProtein,
    DietaryCarbohydrates,
    HeartRate,
    HeartRateVariabilitySdnn,
    RespiratoryRate,
    RestingHeartRate,
    WalkingHeartRateAverage,
    WalkingSpeed,
    WalkingStepLength,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 14] = [
        MeasurementKind::ActiveEnergyBurned,
        MeasurementKind::BasalEnergyBurned,
        MeasurementKind::BodyMass,
        MeasurementKind::DietaryEnergyConsumed,
        MeasurementKind::DietaryFatTotal,
        MeasurementKind::DietaryProtein,
        MeasurementKind::DietaryCarbohydrates,
        MeasurementKind::HeartRate,
        MeasurementKind::HeartRateVariabilitySdnn,
        MeasurementKind::RespiratoryRate,
        MeasurementKind::RestingHeartRate,
        MeasurementKind::WalkingHeartRateAverage,
        MeasurementKind::WalkingSpeed,
        MeasurementKind::WalkingStepLength,
    ];

    /// Resolve a raw `type` attribute.  Returns `None` for anything outside
    /// the fixed table.
    pub fn classify(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.identifier() == identifier)
    }

    /// The HealthKit type identifier as it appears in the export.
    pub fn identifier(&self) -> &'static str {
        match self {
            MeasurementKind::ActiveEnergyBurned => "HKQuantityTypeIdentifierActiveEnergyBurned",
            MeasurementKind::BasalEnergyBurned => "HKQuantityTypeIdentifierBasalEnergyBurned",
            MeasurementKind::BodyMass => "HKQuantityTypeIdentifierBodyMass",
            MeasurementKind::DietaryEnergyConsumed => {
                "HKQuantityTypeIdentifierDietaryEnergyConsumed"
            }
            MeasurementKind::DietaryFatTotal => "HKQuantityTypeIdentifierDietaryFatTotal",
            MeasurementKind::DietaryProtein => "HKQuantityTypeIdentifierDietaryProtein",
            MeasurementKind::DietaryCarbohydrates => "HKQuantityTypeIdentifierDietaryCarbohydrates",
            MeasurementKind::HeartRate => "HKQuantityTypeIdentifierHeartRate",
            MeasurementKind::HeartRateVariabilitySdnn => {
                "HKQuantityTypeIdentifierHeartRateVariabilitySDNN"
            }
            MeasurementKind::RespiratoryRate => "HKQuantityTypeIdentifierRespiratoryRate",
            MeasurementKind::RestingHeartRate => "HKQuantityTypeIdentifierRestingHeartRate",
            MeasurementKind::WalkingHeartRateAverage => {
                "HKQuantityTypeIdentifierWalkingHeartRateAverage"
            }
            MeasurementKind::WalkingSpeed => "HKQuantityTypeIdentifierWalkingSpeed",
            MeasurementKind::WalkingStepLength => "HKQuantityTypeIdentifierWalkingStepLength",
        }
    }

    /// Display label written to the `type` column.
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementKind::ActiveEnergyBurned => "消費カロリー",
            MeasurementKind::BasalEnergyBurned => "基礎代謝",
            MeasurementKind::BodyMass => "体重",
            MeasurementKind::DietaryEnergyConsumed => "摂取カロリー",
            MeasurementKind::DietaryFatTotal => "総脂肪摂取量",
            MeasurementKind::DietaryProtein => "タンパク質摂取量",
            MeasurementKind::DietaryCarbohydrates => "炭水化物摂取量",
            MeasurementKind::HeartRate => "心拍数",
            MeasurementKind::HeartRateVariabilitySdnn => "心拍変動",
            MeasurementKind::RespiratoryRate => "呼吸数",
            MeasurementKind::RestingHeartRate => "安静時心拍数",
            MeasurementKind::WalkingHeartRateAverage => "歩行時平均心拍数",
            MeasurementKind::WalkingSpeed => "歩行速度",
            MeasurementKind::WalkingStepLength => "歩幅",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            MeasurementKind::ActiveEnergyBurned
            | MeasurementKind::BasalEnergyBurned
            | MeasurementKind::BodyMass
            | MeasurementKind::DietaryEnergyConsumed
            | MeasurementKind::DietaryFatTotal
            | MeasurementKind::DietaryProtein
            | MeasurementKind::DietaryCarbohydrates => Category::Nutrition,
            MeasurementKind::HeartRate
            | MeasurementKind::HeartRateVariabilitySdnn
            | MeasurementKind::RespiratoryRate
            | MeasurementKind::RestingHeartRate
            | MeasurementKind::WalkingHeartRateAverage => Category::HeartRate,
            MeasurementKind::WalkingSpeed | MeasurementKind::WalkingStepLength => Category::Walk,
        }
    }

    /// Body mass is a point-in-time snapshot; everything else is an intake or
    /// expenditure that accumulates over the day.
    pub fn daily_rule(&self) -> DailyRule {
        match self {
            MeasurementKind::BodyMass => DailyRule::Max,
            _ => DailyRule::Sum,
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
