//! Synthetic dataset generation.
//!
//! Writes one reading table per city/district/day and one metadata document
//! per city/day, in the layout the loader expects.

use anyhow::{Context, Result};
use chrono::Days;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use tracing::{debug, info};

use crate::analyzers::utility::round2;
use crate::config::{GeneratorConfig, PipelineConfig, metadata_file_path, reading_file_path};
use crate::output::{write_csv, write_json};
use crate::parser::{CityMetadata, DistrictMetadata, Reading};
use crate::timestamp::{ReadingTime, format_date};

/// Counts of what a generation run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub metadata_files: usize,
    pub reading_files: usize,
    pub readings: usize,
    pub missing_readings: usize,
}

pub fn city_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("City{}", i)).collect()
}

pub fn district_id(k: usize) -> String {
    format!("{}", 100 + k)
}

pub fn household_id(h: usize) -> String {
    format!("H{:03}", h)
}

/// Generates the sample dataset under `paths.data_dir`, overwriting files of
/// the same name.
#[tracing::instrument(skip_all, fields(data_dir = %paths.data_dir.display(), seed = ?settings.seed))]
pub fn generate_sample_data(
    paths: &PipelineConfig,
    settings: &GeneratorConfig,
) -> Result<GenerationSummary> {
    let csv_dir = paths.csv_dir();
    let json_dir = paths.json_dir();
    fs::create_dir_all(&csv_dir).with_context(|| format!("creating {}", csv_dir.display()))?;
    fs::create_dir_all(&json_dir).with_context(|| format!("creating {}", json_dir.display()))?;

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut summary = GenerationSummary::default();

    for city in city_names(settings.num_cities) {
        for d in 0..settings.num_days {
            let day = settings
                .start_date
                .checked_add_days(Days::new(d as u64))
                .context("generation date out of range")?;
            let date = format_date(day);
            let mut districts = Vec::with_capacity(settings.num_districts);

            for k in 1..=settings.num_districts {
                let id = district_id(k);
                let (lo, hi) = settings.threshold_range;
                let threshold = round2(rng.gen_range(lo..=hi));
                districts.push(DistrictMetadata {
                    district_id: id.clone(),
                    threshold,
                });

                let mut rows = Vec::with_capacity(settings.num_households * 24);
                for h in 1..=settings.num_households {
                    for hour in 0..24 {
                        let (lo, hi) = settings.consumption_range;
                        let consumption_kwh = if rng.gen_bool(settings.missing_rate) {
                            summary.missing_readings += 1;
                            None
                        } else {
                            Some(round2(rng.gen_range(lo..=hi)))
                        };
                        let timestamp =
                            ReadingTime::new(day, hour).context("hour of day out of range")?;
                        rows.push(Reading {
                            household_id: household_id(h),
                            timestamp,
                            consumption_kwh,
                        });
                    }
                }

                let path = reading_file_path(&csv_dir, &city, &id, &date);
                write_csv(&path, &rows)?;
                debug!(path = %path.display(), rows = rows.len(), "Wrote reading table");
                summary.reading_files += 1;
                summary.readings += rows.len();
            }

            let meta = CityMetadata {
                city: city.clone(),
                date: date.clone(),
                districts,
                critical_hours: settings.critical_hours.clone(),
            };
            write_json(&metadata_file_path(&json_dir, &city, &date), &meta)?;
            summary.metadata_files += 1;
        }
    }

    info!(
        metadata_files = summary.metadata_files,
        reading_files = summary.reading_files,
        readings = summary.readings,
        missing = summary.missing_readings,
        "Sample data generated"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_city_metadata, read_readings};
    use std::env;

    fn small(seed: Option<u64>) -> GeneratorConfig {
        GeneratorConfig {
            num_cities: 1,
            num_districts: 2,
            num_households: 2,
            num_days: 2,
            seed,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_naming() {
        assert_eq!(city_names(2), vec!["City1", "City2"]);
        assert_eq!(district_id(1), "101");
        assert_eq!(household_id(7), "H007");
    }

    #[test]
    fn test_generate_writes_expected_layout() {
        let root = env::temp_dir().join("smart_grid_generate_layout");
        let _ = fs::remove_dir_all(&root);
        let paths = PipelineConfig::new(root.join("data"), root.join("output"));

        let summary = generate_sample_data(&paths, &small(Some(7))).unwrap();
        assert_eq!(summary.metadata_files, 2);
        assert_eq!(summary.reading_files, 4);
        assert_eq!(summary.readings, 4 * 2 * 24);

        let meta_path = metadata_file_path(&paths.json_dir(), "City1", "2025-09-11");
        let meta = parse_city_metadata(&fs::read(meta_path).unwrap()).unwrap();
        assert_eq!(meta.districts.len(), 2);
        assert_eq!(meta.critical_hours, vec!["18:00", "19:00", "20:00", "21:00"]);
        for d in &meta.districts {
            assert!((1.0..=2.0).contains(&d.threshold));
        }

        let rows = read_readings(&reading_file_path(
            &paths.csv_dir(),
            "City1",
            "102",
            "2025-09-10",
        ))
        .unwrap();
        assert_eq!(rows.len(), 48);
        assert_eq!(rows[0].timestamp.to_string(), "2025-09-10 00:00");
        assert_eq!(rows[47].household_id, "H002");
        for r in rows.iter().filter_map(|r| r.consumption_kwh) {
            assert!((0.5..=2.5).contains(&r));
        }

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let root = env::temp_dir().join("smart_grid_generate_seeded");
        let _ = fs::remove_dir_all(&root);
        let a = PipelineConfig::new(root.join("a"), root.join("out"));
        let b = PipelineConfig::new(root.join("b"), root.join("out"));

        generate_sample_data(&a, &small(Some(42))).unwrap();
        generate_sample_data(&b, &small(Some(42))).unwrap();

        let file = |p: &PipelineConfig| {
            fs::read(reading_file_path(&p.csv_dir(), "City1", "101", "2025-09-10")).unwrap()
        };
        assert_eq!(file(&a), file(&b));

        fs::remove_dir_all(&root).unwrap();
    }
}
