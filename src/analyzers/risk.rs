use crate::analyzers::types::RiskLevel;
use crate::analyzers::utility::round2;

/// Violation ratio at or above which a district is scored regardless of its
/// peak hour.
pub const VIOLATION_RATIO_GATE: f64 = 0.25;

const VIOLATION_WEIGHT: f64 = 0.6;
const PEAK_HOUR_WEIGHT: f64 = 0.4;

/// Whether a district/day gets a nonzero score at all.
pub fn eligible(violation_ratio: f64, peak_hour_risk: bool) -> bool {
    violation_ratio >= VIOLATION_RATIO_GATE || peak_hour_risk
}

/// Weighted score, rounded to two decimals. Does not apply the gate.
pub fn score(violation_ratio: f64, peak_hour_risk: bool) -> f64 {
    let peak = if peak_hour_risk { 1.0 } else { 0.0 };
    round2(VIOLATION_WEIGHT * violation_ratio + PEAK_HOUR_WEIGHT * peak)
}

/// The gated score: [`score`] when [`eligible`], else `0.0`.
pub fn risk_score(violation_ratio: f64, peak_hour_risk: bool) -> f64 {
    if eligible(violation_ratio, peak_hour_risk) {
        score(violation_ratio, peak_hour_risk)
    } else {
        0.0
    }
}

/// Maps a risk score onto a level.
///
/// | Score           | Level   |
/// |-----------------|---------|
/// | == 0            | NO RISK |
/// | (0, 0.30]       | LOW     |
/// | (0.30, 0.60]    | MEDIUM  |
/// | > 0.60          | HIGH    |
pub fn risk_level(score: f64) -> RiskLevel {
    match score {
        s if s <= 0.0 => RiskLevel::NoRisk,
        s if s <= 0.30 => RiskLevel::Low,
        s if s <= 0.60 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}
