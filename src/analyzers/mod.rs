//! District/day aggregation and risk scoring.
//!
//! This module groups the unified reading table by city, district and day,
//! computes consumption statistics and threshold violations, classifies each
//! group's risk, and persists per-city summaries and per-day reports.

pub mod aggregate;
pub mod analyzer;
pub mod risk;
pub mod types;
pub mod utility;
