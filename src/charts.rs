//! PNG charts for human inspection: a risk-level bar chart per city and an
//! hourly consumption trend per district/day.

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::aggregate::{GroupKey, group_rows, hourly_totals, peak_hour};
use crate::analyzers::types::{DistrictDaySummary, RiskLevel, UnifiedRow};
use crate::timestamp::hour_label;

/// Hourly totals of one district/day and the hour they peak at.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyTrend {
    pub totals: BTreeMap<u32, f64>,
    pub peak_hour: u32,
}

/// Districts per risk level for every city, indexed like [`RiskLevel::ALL`].
/// Levels that never occur stay at zero.
pub fn risk_distribution(summaries: &[DistrictDaySummary]) -> BTreeMap<&str, [usize; 4]> {
    let mut counts: BTreeMap<&str, [usize; 4]> = BTreeMap::new();
    for s in summaries {
        counts.entry(s.city.as_str()).or_default()[s.risk_level.index()] += 1;
    }
    counts
}

pub fn hourly_trends(rows: &[UnifiedRow]) -> BTreeMap<GroupKey, HourlyTrend> {
    group_rows(rows)
        .into_iter()
        .filter_map(|(key, group)| {
            let totals = hourly_totals(&group);
            let peak_hour = peak_hour(&totals)?;
            Some((key, HourlyTrend { totals, peak_hour }))
        })
        .collect()
}

pub fn risk_chart_path(dir: &Path, city: &str) -> PathBuf {
    dir.join(format!("{}_risk_levels.png", city))
}

pub fn trend_chart_path(dir: &Path, key: &GroupKey) -> PathBuf {
    dir.join(format!(
        "{}_{}_{}_trend.png",
        key.city, key.district_id, key.date
    ))
}

fn level_color(level: RiskLevel) -> RGBColor {
    match level {
        RiskLevel::NoRisk => RGBColor(128, 128, 128),
        RiskLevel::Low => RGBColor(154, 205, 50),
        RiskLevel::Medium => RGBColor(255, 165, 0),
        RiskLevel::High => RED,
    }
}

/// Renders every chart into `plots_dir` and returns how many were written.
///
/// Rendering failures are not recovered.
#[tracing::instrument(skip_all, fields(plots_dir = %plots_dir.display()))]
pub fn visualize(
    summaries: &[DistrictDaySummary],
    rows: &[UnifiedRow],
    plots_dir: &Path,
) -> Result<usize> {
    fs::create_dir_all(plots_dir)
        .with_context(|| format!("creating {}", plots_dir.display()))?;
    let mut written = 0;

    for (city, counts) in risk_distribution(summaries) {
        let path = risk_chart_path(plots_dir, city);
        render_risk_levels(&path, city, &counts)
            .with_context(|| format!("rendering {}", path.display()))?;
        debug!(path = %path.display(), "Wrote risk chart");
        written += 1;
    }

    for (key, trend) in hourly_trends(rows) {
        let path = trend_chart_path(plots_dir, &key);
        render_hourly_trend(&path, &key, &trend)
            .with_context(|| format!("rendering {}", path.display()))?;
        debug!(path = %path.display(), "Wrote trend chart");
        written += 1;
    }

    info!(charts = written, "Charts rendered");
    Ok(written)
}

pub fn render_risk_levels(path: &Path, city: &str, counts: &[usize; 4]) -> Result<()> {
    let root = BitMapBackend::new(path, (600, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = counts.iter().copied().max().unwrap_or(0) as u32 + 1;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Risk Level Distribution - {}", city), ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..4u32).into_segmented(), 0u32..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Number of Districts")
        .x_label_formatter(&|v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) => RiskLevel::ALL
                .get(*i as usize)
                .map(|l| l.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(RiskLevel::ALL.iter().zip(counts).map(|(level, &count)| {
        let i = level.index() as u32;
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(i), 0),
                (SegmentValue::Exact(i + 1), count as u32),
            ],
            level_color(*level).filled(),
        );
        bar.set_margin(0, 0, 10, 10);
        bar
    }))?;

    root.present()?;
    Ok(())
}

pub fn render_hourly_trend(path: &Path, key: &GroupKey, trend: &HourlyTrend) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = trend.totals.values().copied().fold(0.0, f64::max) * 1.1 + 0.1;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Hourly Consumption Trend - {} District {} ({})",
                key.city, key.district_id, key.date
            ),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0u32..23u32, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Hour of Day")
        .y_desc("Total Consumption (kWh)")
        .draw()?;

    let points: Vec<(u32, f64)> = trend.totals.iter().map(|(&h, &v)| (h, v)).collect();
    chart
        .draw_series(LineSeries::new(points.clone(), &BLUE))?
        .label("Total Consumption")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, BLUE.filled())))?;

    let peak = trend.peak_hour;
    chart
        .draw_series(LineSeries::new(
            vec![(peak, 0.0), (peak, y_max)],
            RED.stroke_width(2),
        ))?
        .label(format!("Peak Hour {}", hour_label(peak)))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
