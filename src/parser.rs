//! Parsers for the two input formats: per-city metadata documents (JSON) and
//! per-district reading tables (CSV).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::timestamp::ReadingTime;

fn unknown_city() -> String {
    "UnknownCity".to_string()
}

fn unknown_date() -> String {
    "UnknownDate".to_string()
}

fn unknown_district() -> String {
    "Unknown".to_string()
}

fn default_threshold() -> f64 {
    1.5
}

/// Consumption limit of one district on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictMetadata {
    #[serde(default = "unknown_district")]
    pub district_id: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// Metadata for one city on one day, as stored in `city_<city>_<date>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMetadata {
    #[serde(default = "unknown_city")]
    pub city: String,
    #[serde(default = "unknown_date")]
    pub date: String,
    #[serde(default)]
    pub districts: Vec<DistrictMetadata>,
    /// Peak-demand hours as `"HH:00"` strings.
    #[serde(default)]
    pub critical_hours: Vec<String>,
}

/// One hourly reading of one household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub household_id: String,
    pub timestamp: ReadingTime,
    /// `None` when the meter reported nothing for that hour.
    pub consumption_kwh: Option<f64>,
}

/// Decodes a metadata document.
///
/// # Errors
///
/// Returns an error if the bytes are not a JSON object of the expected shape.
pub fn parse_city_metadata(bytes: &[u8]) -> serde_json::Result<CityMetadata> {
    serde_json::from_slice(bytes)
}

/// Reads every row of a reading table. A consumption field that is empty or
/// `NaN` is returned as `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row does not decode,
/// including rows with an unparseable timestamp.
pub fn read_readings(path: &Path) -> Result<Vec<Reading>, csv::Error> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let mut record: Reading = result?;
        if record.consumption_kwh.is_some_and(f64::is_nan) {
            record.consumption_kwh = None;
        }
        rows.push(record);
    }

    Ok(rows)
}
