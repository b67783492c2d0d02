//! Run configuration: where inputs live, where outputs go, and how sample
//! data is generated.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Peak-demand hours declared for every generated city.
pub const DEFAULT_CRITICAL_HOURS: &[&str] = &["18:00", "19:00", "20:00", "21:00"];

/// Directory layout for a single run.
///
/// ```text
/// <data_dir>/csv/district_<city>_<district_id>_<date>.csv
/// <data_dir>/json/city_<city>_<date>.json
/// <output_dir>/summary_csv/<city>_summary.csv
/// <output_dir>/reports_json/<city>_<date>_report.json
/// <plots_dir>/<city>_risk_levels.png
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub plots_dir: PathBuf,
}

impl PipelineConfig {
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        Self {
            data_dir: data_dir.into(),
            plots_dir: output_dir.join("plots"),
            output_dir,
        }
    }

    pub fn with_plots_dir(mut self, plots_dir: impl Into<PathBuf>) -> Self {
        self.plots_dir = plots_dir.into();
        self
    }

    pub fn csv_dir(&self) -> PathBuf {
        self.data_dir.join("csv")
    }

    pub fn json_dir(&self) -> PathBuf {
        self.data_dir.join("json")
    }

    pub fn summary_dir(&self) -> PathBuf {
        self.output_dir.join("summary_csv")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.output_dir.join("reports_json")
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new("data", "output")
    }
}

pub fn reading_file_path(csv_dir: &Path, city: &str, district_id: &str, date: &str) -> PathBuf {
    csv_dir.join(format!("district_{}_{}_{}.csv", city, district_id, date))
}

pub fn metadata_file_path(json_dir: &Path, city: &str, date: &str) -> PathBuf {
    json_dir.join(format!("city_{}_{}.json", city, date))
}

/// Sizing and randomness of the synthetic dataset.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub num_cities: usize,
    pub num_districts: usize,
    pub num_households: usize,
    pub num_days: usize,
    pub start_date: NaiveDate,
    /// Probability that a single hourly reading is left empty.
    pub missing_rate: f64,
    pub threshold_range: (f64, f64),
    pub consumption_range: (f64, f64),
    pub critical_hours: Vec<String>,
    /// Fixed seed for reproducible output; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_cities: 2,
            num_districts: 3,
            num_households: 10,
            num_days: 2,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 10).unwrap_or_default(),
            missing_rate: 0.05,
            threshold_range: (1.0, 2.0),
            consumption_range: (0.5, 2.5),
            critical_hours: DEFAULT_CRITICAL_HOURS
                .iter()
                .map(|h| h.to_string())
                .collect(),
            seed: None,
        }
    }
}
