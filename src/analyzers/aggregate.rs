use crate::analyzers::risk::{risk_level, risk_score};
use crate::analyzers::types::{
    CityDayReport, CriticalAlert, DistrictDaySummary, ReportSummary, RiskLevel, UnifiedRow,
};
use crate::analyzers::utility::{max, mean, min, percent};
use crate::timestamp::hour_label;
use std::collections::BTreeMap;

/// Identifies one district on one day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub city: String,
    pub district_id: String,
    pub date: String,
}

impl GroupKey {
    pub fn of(row: &UnifiedRow) -> Self {
        Self {
            city: row.city.clone(),
            district_id: row.district_id.clone(),
            date: row.timestamp.date_key(),
        }
    }
}

/// Partitions rows by (city, district, date). Groups iterate in key order and
/// are never empty.
pub fn group_rows(rows: &[UnifiedRow]) -> BTreeMap<GroupKey, Vec<&UnifiedRow>> {
    let mut groups: BTreeMap<GroupKey, Vec<&UnifiedRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(GroupKey::of(row)).or_default().push(row);
    }
    groups
}

/// Total consumption per hour of day, for the hours present in `rows`.
pub fn hourly_totals(rows: &[&UnifiedRow]) -> BTreeMap<u32, f64> {
    let mut totals = BTreeMap::new();
    for row in rows {
        *totals.entry(row.timestamp.hour()).or_insert(0.0) += row.consumption_kwh;
    }
    totals
}

/// The hour with the largest total. Ties go to the earliest hour.
pub fn peak_hour(totals: &BTreeMap<u32, f64>) -> Option<u32> {
    let mut best: Option<(u32, f64)> = None;
    for (&hour, &total) in totals {
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((hour, total)),
        }
    }
    best.map(|(hour, _)| hour)
}

/// Computes the statistics and risk classification of a single group.
///
/// Returns `None` for an empty group.
pub fn summarize_group(key: &GroupKey, rows: &[&UnifiedRow]) -> Option<DistrictDaySummary> {
    let first = rows.first()?;

    let values: Vec<f64> = rows.iter().map(|r| r.consumption_kwh).collect();
    let avg_consumption = mean(&values)?;
    let min_consumption = min(&values)?;
    let max_consumption = max(&values)?;

    let peak = peak_hour(&hourly_totals(rows))?;
    let peak_label = hour_label(peak);
    let peak_hour_risk = first.critical_hours.iter().any(|h| *h == peak_label);

    let violations = rows
        .iter()
        .filter(|r| r.consumption_kwh > r.threshold)
        .count();
    let violation_ratio = violations as f64 / rows.len() as f64;

    let score = risk_score(violation_ratio, peak_hour_risk);

    Some(DistrictDaySummary {
        city: key.city.clone(),
        district_id: key.district_id.clone(),
        date: key.date.clone(),
        avg_consumption,
        min_consumption,
        max_consumption,
        peak_hour: peak_label,
        violations,
        violation_ratio,
        risk_score: score,
        risk_level: risk_level(score),
    })
}

/// One summary per (city, district, date), ordered by that key.
pub fn summarize(rows: &[UnifiedRow]) -> Vec<DistrictDaySummary> {
    group_rows(rows)
        .iter()
        .filter_map(|(key, group)| summarize_group(key, group))
        .collect()
}

/// Rolls district summaries up into one report per (city, date), ordered by
/// that key.
pub fn build_reports(summaries: &[DistrictDaySummary]) -> Vec<CityDayReport> {
    let mut by_city_day: BTreeMap<(&str, &str), Vec<&DistrictDaySummary>> = BTreeMap::new();
    for s in summaries {
        by_city_day
            .entry((s.city.as_str(), s.date.as_str()))
            .or_default()
            .push(s);
    }

    by_city_day
        .into_iter()
        .map(|((city, date), districts)| {
            let count = |level: RiskLevel| districts.iter().filter(|d| d.risk_level == level).count();

            let critical_alerts = districts
                .iter()
                .filter(|d| d.risk_score > 0.0)
                .map(|d| CriticalAlert {
                    district_id: d.district_id.clone(),
                    violation_pct: percent(d.violation_ratio),
                    risk_score: d.risk_score,
                    risk_level: d.risk_level,
                })
                .collect();

            CityDayReport {
                city: city.to_string(),
                date: date.to_string(),
                summary: ReportSummary {
                    total_districts: districts.len(),
                    high_risk_districts: count(RiskLevel::High),
                    medium_risk_districts: count(RiskLevel::Medium),
                    low_risk_districts: count(RiskLevel::Low),
                },
                critical_alerts,
            }
        })
        .collect()
}
