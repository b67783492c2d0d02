//! Data types used by the aggregation pipeline.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::timestamp::ReadingTime;

/// A reading joined with its district's metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRow {
    pub household_id: String,
    pub timestamp: ReadingTime,
    /// Always present: missing values are imputed while loading.
    pub consumption_kwh: f64,
    pub city: String,
    pub district_id: String,
    pub threshold: f64,
    /// Shared by every row of the same city/day.
    pub critical_hours: Arc<[String]>,
}

/// Risk classification of a district on a day, in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "NO RISK")]
    NoRisk,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "HIGH")]
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::NoRisk,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::NoRisk => "NO RISK",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    /// Position within [`RiskLevel::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statistics for one (city, district, date) group. One row of a summary CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictDaySummary {
    pub city: String,
    pub district_id: String,
    pub date: String,
    pub avg_consumption: f64,
    pub min_consumption: f64,
    pub max_consumption: f64,
    /// `"HH:00"`
    pub peak_hour: String,
    pub violations: usize,
    pub violation_ratio: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

/// A district with a nonzero risk score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalAlert {
    pub district_id: String,
    /// Violation ratio as a percentage with one decimal, e.g. `"33.3%"`.
    #[serde(rename = "Avg % of violations per day")]
    pub violation_pct: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

/// District counts per risk level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_districts: usize,
    pub high_risk_districts: usize,
    pub medium_risk_districts: usize,
    pub low_risk_districts: usize,
}

/// Roll-up of every district of a city on a day, written as
/// `<city>_<date>_report.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityDayReport {
    pub city: String,
    pub date: String,
    pub summary: ReportSummary,
    pub critical_alerts: Vec<CriticalAlert>,
}
