use crate::analyzers::aggregate::{build_reports, summarize};
use crate::analyzers::types::{CityDayReport, DistrictDaySummary, UnifiedRow};
use crate::config::PipelineConfig;
use crate::output::{write_csv, write_json};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Results of one aggregation pass.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub summaries: Vec<DistrictDaySummary>,
    pub reports: Vec<CityDayReport>,
}

/// Summarizes the unified table, writes one summary CSV per city and one
/// report JSON per city/day, and returns what was written.
#[tracing::instrument(skip_all, fields(rows = rows.len(), output_dir = %config.output_dir.display()))]
pub fn analyze(rows: &[UnifiedRow], config: &PipelineConfig) -> Result<Analysis> {
    let summaries = summarize(rows);
    let reports = build_reports(&summaries);
    info!(
        groups = summaries.len(),
        reports = reports.len(),
        "Aggregation complete"
    );

    write_summaries(&config.summary_dir(), &summaries)?;
    write_reports(&config.reports_dir(), &reports)?;

    Ok(Analysis { summaries, reports })
}

pub fn summary_path(dir: &Path, city: &str) -> PathBuf {
    dir.join(format!("{}_summary.csv", city))
}

pub fn report_path(dir: &Path, city: &str, date: &str) -> PathBuf {
    dir.join(format!("{}_{}_report.json", city, date))
}

fn write_summaries(dir: &Path, summaries: &[DistrictDaySummary]) -> Result<()> {
    let mut by_city: BTreeMap<&str, Vec<&DistrictDaySummary>> = BTreeMap::new();
    for s in summaries {
        by_city.entry(s.city.as_str()).or_default().push(s);
    }

    for (city, rows) in by_city {
        let path = summary_path(dir, city);
        write_csv(&path, &rows)?;
        info!(path = %path.display(), rows = rows.len(), "Wrote city summary");
    }

    Ok(())
}

fn write_reports(dir: &Path, reports: &[CityDayReport]) -> Result<()> {
    for report in reports {
        let path = report_path(dir, &report.city, &report.date);
        write_json(&path, report)?;
        info!(
            path = %path.display(),
            alerts = report.critical_alerts.len(),
            "Wrote city report"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::ReadingTime;
    use std::env;
    use std::fs;
    use std::sync::Arc;

    fn rows() -> Vec<UnifiedRow> {
        let hours: Arc<[String]> = Arc::from(vec!["18:00".to_string()]);
        let mut rows = Vec::new();
        for (city, district) in [("City1", "101"), ("City1", "102"), ("City2", "101")] {
            for h in 0..24 {
                let kwh = if h == 18 || h == 19 { 3.0 } else { 1.0 };
                rows.push(UnifiedRow {
                    household_id: "H001".to_string(),
                    timestamp: ReadingTime::parse(&format!("2025-09-10 {:02}:00", h)).unwrap(),
                    consumption_kwh: kwh,
                    city: city.to_string(),
                    district_id: district.to_string(),
                    threshold: 1.5,
                    critical_hours: hours.clone(),
                });
            }
        }
        rows
    }

    #[test]
    fn test_analyze_writes_per_city_outputs() {
        let out = env::temp_dir().join("smart_grid_analyzer_test_outputs");
        let _ = fs::remove_dir_all(&out);
        let config = PipelineConfig::new("unused", &out);

        let analysis = analyze(&rows(), &config).unwrap();
        assert_eq!(analysis.summaries.len(), 3);
        assert_eq!(analysis.reports.len(), 2);

        let city1 = fs::read_to_string(summary_path(&config.summary_dir(), "City1")).unwrap();
        assert_eq!(city1.lines().count(), 3);
        assert!(summary_path(&config.summary_dir(), "City2").exists());

        let report: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(report_path(&config.reports_dir(), "City1", "2025-09-10"))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(report["summary"]["total_districts"], 2);
        assert_eq!(report["summary"]["low_risk_districts"], 0);
        assert_eq!(report["critical_alerts"][0]["risk_score"], 0.45);
        assert_eq!(report["critical_alerts"][0]["Avg % of violations per day"], "8.3%");

        fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn test_analyze_is_byte_identical_across_runs() {
        let out = env::temp_dir().join("smart_grid_analyzer_test_idempotent");
        let _ = fs::remove_dir_all(&out);
        let config = PipelineConfig::new("unused", &out);
        let rows = rows();

        analyze(&rows, &config).unwrap();
        let summary_a = fs::read(summary_path(&config.summary_dir(), "City1")).unwrap();
        let report_a = fs::read(report_path(&config.reports_dir(), "City1", "2025-09-10")).unwrap();

        analyze(&rows, &config).unwrap();
        let summary_b = fs::read(summary_path(&config.summary_dir(), "City1")).unwrap();
        let report_b = fs::read(report_path(&config.reports_dir(), "City1", "2025-09-10")).unwrap();

        assert_eq!(summary_a, summary_b);
        assert_eq!(report_a, report_b);

        fs::remove_dir_all(&out).unwrap();
    }
}
