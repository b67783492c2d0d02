//! Output formatting and persistence for analysis results.
//!
//! Supports log-printing, pretty JSON documents, and CSV tables.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::DistrictDaySummary;
use csv::WriterBuilder;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Logs the first `n` summary rows, one line each.
pub fn print_head(summaries: &[DistrictDaySummary], n: usize) {
    for s in summaries.iter().take(n) {
        info!(
            city = %s.city,
            district_id = %s.district_id,
            date = %s.date,
            avg_consumption = s.avg_consumption,
            peak_hour = %s.peak_hour,
            violations = s.violations,
            risk_score = s.risk_score,
            risk_level = %s.risk_level,
            "Summary"
        );
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Writes `records` as a CSV table with a header row, replacing any existing file.
pub fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    ensure_parent(path)?;
    debug!(path = %path.display(), rows = records.len(), "Writing CSV table");

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes `value` as pretty-printed JSON, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    ensure_parent(path)?;
    debug!(path = %path.display(), "Writing JSON document");

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
    }
    Ok(())
}
