//! Loads metadata documents and their reading tables, imputes missing
//! consumption values, and merges everything into one unified table.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analyzers::types::UnifiedRow;
use crate::analyzers::utility::mean;
use crate::config::{PipelineConfig, reading_file_path};
use crate::error::LoadError;
use crate::parser::{CityMetadata, DistrictMetadata, Reading, parse_city_metadata, read_readings};

/// The merged table plus every file that was skipped on the way.
#[derive(Debug)]
pub struct LoadReport {
    pub rows: Vec<UnifiedRow>,
    pub tables_merged: usize,
    pub skipped: Vec<LoadError>,
}

/// Reads every metadata document under `<data>/json` and the reading tables
/// it declares under `<data>/csv`.
///
/// Malformed metadata, missing or empty tables, and tables without a single
/// consumption value are skipped. Each skip is logged with `warn!`, which the
/// CLI sends to stderr and the JSON log file, and is recorded in
/// [`LoadReport::skipped`].
///
/// # Errors
///
/// Returns [`LoadError::NoData`] when no table could be merged. Other I/O
/// failures propagate unchanged.
#[tracing::instrument(skip_all, fields(data_dir = %config.data_dir.display()))]
pub fn load_and_merge(config: &PipelineConfig) -> Result<LoadReport> {
    let json_dir = config.json_dir();
    let csv_dir = config.csv_dir();

    let mut report = LoadReport {
        rows: Vec::new(),
        tables_merged: 0,
        skipped: Vec::new(),
    };

    for path in metadata_files(&json_dir)? {
        let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let meta = match parse_city_metadata(&bytes) {
            Ok(meta) => meta,
            Err(source) => {
                skip(&mut report, LoadError::MalformedMetadata { path, source });
                continue;
            }
        };
        debug!(
            path = %path.display(),
            city = %meta.city,
            date = %meta.date,
            districts = meta.districts.len(),
            "Metadata parsed"
        );

        let critical_hours: Arc<[String]> = Arc::from(meta.critical_hours.clone());
        for district in &meta.districts {
            match load_table(&csv_dir, &meta, district, &critical_hours) {
                Ok(rows) => {
                    report.tables_merged += 1;
                    report.rows.extend(rows);
                }
                Err(err) => skip(&mut report, err),
            }
        }
    }

    if report.tables_merged == 0 {
        return Err(LoadError::NoData {
            metadata_dir: json_dir,
        }
        .into());
    }

    info!(
        rows = report.rows.len(),
        tables = report.tables_merged,
        skipped = report.skipped.len(),
        "Loaded consumption data"
    );
    Ok(report)
}

fn skip(report: &mut LoadReport, err: LoadError) {
    debug_assert!(err.is_recoverable());
    warn!(path = %err.path().display(), error = %err, "Skipping input file");
    report.skipped.push(err);
}

/// `*.json` files of `dir` in file-name order. A missing directory has none.
fn metadata_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "Metadata directory not found");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

fn load_table(
    csv_dir: &Path,
    meta: &CityMetadata,
    district: &DistrictMetadata,
    critical_hours: &Arc<[String]>,
) -> Result<Vec<UnifiedRow>, LoadError> {
    let path = reading_file_path(csv_dir, &meta.city, &district.district_id, &meta.date);
    if !path.exists() {
        return Err(LoadError::MissingTabularFile { path });
    }

    let readings = match read_readings(&path) {
        Ok(readings) => readings,
        Err(source) => return Err(LoadError::MalformedTabularFile { path, source }),
    };
    if readings.is_empty() {
        return Err(LoadError::EmptyTabularFile { path });
    }

    let Some(values) = impute(&readings) else {
        return Err(LoadError::AllValuesMissing { path });
    };

    let rows = readings
        .into_iter()
        .zip(values)
        .map(|(reading, consumption_kwh)| UnifiedRow {
            household_id: reading.household_id,
            timestamp: reading.timestamp,
            consumption_kwh,
            city: meta.city.clone(),
            district_id: district.district_id.clone(),
            threshold: district.threshold,
            critical_hours: Arc::clone(critical_hours),
        })
        .collect::<Vec<_>>();

    debug!(path = %path.display(), rows = rows.len(), "Reading table merged");
    Ok(rows)
}

/// Consumption values with gaps filled by the mean of the present values.
///
/// Returns `None` when no value is present.
pub fn impute(readings: &[Reading]) -> Option<Vec<f64>> {
    let present: Vec<f64> = readings.iter().filter_map(|r| r.consumption_kwh).collect();
    let fill = mean(&present)?;

    Some(
        readings
            .iter()
            .map(|r| r.consumption_kwh.unwrap_or(fill))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::ReadingTime;
    use std::env;

    fn reading(hour: u32, kwh: Option<f64>) -> Reading {
        Reading {
            household_id: "H001".to_string(),
            timestamp: ReadingTime::parse(&format!("2025-09-10 {:02}:00", hour)).unwrap(),
            consumption_kwh: kwh,
        }
    }

    fn scratch(name: &str) -> PipelineConfig {
        let root = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&root);
        let config = PipelineConfig::new(root.join("data"), root.join("output"));
        fs::create_dir_all(config.csv_dir()).unwrap();
        fs::create_dir_all(config.json_dir()).unwrap();
        config
    }

    const METADATA: &str = r#"{
        "city": "City1",
        "date": "2025-09-10",
        "districts": [
            {"district_id": "101", "threshold": 1.5},
            {"district_id": "102", "threshold": 1.2}
        ],
        "critical_hours": ["18:00", "19:00"]
    }"#;

    #[test]
    fn test_impute_fills_with_mean() {
        let readings = [reading(0, Some(1.0)), reading(1, None), reading(2, Some(3.0))];
        assert_eq!(impute(&readings), Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_impute_all_missing() {
        let readings = [reading(0, None), reading(1, None)];
        assert_eq!(impute(&readings), None);
    }

    #[test]
    fn test_load_merges_and_skips_missing_table() {
        let config = scratch("smart_grid_loader_merge");
        fs::write(config.json_dir().join("city_City1_2025-09-10.json"), METADATA).unwrap();
        fs::write(
            reading_file_path(&config.csv_dir(), "City1", "101", "2025-09-10"),
            "household_id,timestamp,consumption_kwh\n\
             H001,2025-09-10 18:00,1.0\n\
             H002,2025-09-10 18:00,\n\
             H003,2025-09-10 18:00,3.0\n",
        )
        .unwrap();

        let report = load_and_merge(&config).unwrap();
        assert_eq!(report.tables_merged, 1);
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(
            report.skipped[0],
            LoadError::MissingTabularFile { .. }
        ));

        let row = &report.rows[1];
        assert_eq!(row.consumption_kwh, 2.0);
        assert_eq!(row.city, "City1");
        assert_eq!(row.district_id, "101");
        assert_eq!(row.threshold, 1.5);
        assert_eq!(&row.critical_hours[..], ["18:00", "19:00"]);

        fs::remove_dir_all(config.data_dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_load_skips_malformed_metadata_and_empty_tables() {
        let config = scratch("smart_grid_loader_skips");
        fs::write(config.json_dir().join("city_Broken_2025-09-10.json"), "{ nope").unwrap();
        fs::write(config.json_dir().join("city_City1_2025-09-10.json"), METADATA).unwrap();
        fs::write(
            reading_file_path(&config.csv_dir(), "City1", "101", "2025-09-10"),
            "household_id,timestamp,consumption_kwh\n",
        )
        .unwrap();
        fs::write(
            reading_file_path(&config.csv_dir(), "City1", "102", "2025-09-10"),
            "household_id,timestamp,consumption_kwh\nH001,2025-09-10 05:00,0.9\n",
        )
        .unwrap();

        let report = load_and_merge(&config).unwrap();
        assert_eq!(report.tables_merged, 1);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].district_id, "102");

        let kinds: Vec<&str> = report
            .skipped
            .iter()
            .map(|e| match e {
                LoadError::MalformedMetadata { .. } => "metadata",
                LoadError::EmptyTabularFile { .. } => "empty",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["metadata", "empty"]);

        fs::remove_dir_all(config.data_dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_load_skips_table_without_values() {
        let config = scratch("smart_grid_loader_all_missing");
        fs::write(config.json_dir().join("city_City1_2025-09-10.json"), METADATA).unwrap();
        fs::write(
            reading_file_path(&config.csv_dir(), "City1", "101", "2025-09-10"),
            "household_id,timestamp,consumption_kwh\nH001,2025-09-10 00:00,\n",
        )
        .unwrap();

        let err = load_and_merge(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::NoData { .. })
        ));

        fs::remove_dir_all(config.data_dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_load_without_metadata_dir_is_no_data() {
        let root = env::temp_dir().join("smart_grid_loader_nothing");
        let _ = fs::remove_dir_all(&root);
        let config = PipelineConfig::new(root.join("data"), root.join("output"));

        let err = load_and_merge(&config).unwrap_err();
        assert!(err.to_string().contains("no data found"));
    }
}
