//! Plain-text run summary: campus-wide totals, the heaviest building, the
//! single peak reading, and the heaviest day and week.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use energy_domain::{PeriodTotal, ReadingRow};
use time::{format_description::well_known::Rfc3339, Date, OffsetDateTime};

use crate::pipeline::PipelineError;
use crate::registry::BuildingReport;

/// First-seen wins on ties, matching source-enumeration order.
fn peak_reading(rows: &[ReadingRow]) -> Option<&ReadingRow> {
    rows.iter().fold(None, |best, row| match best {
        Some(b) if row.reading.kwh <= b.reading.kwh => Some(b),
        _ => Some(row),
    })
}

fn top_building(reports: &[BuildingReport]) -> Option<&BuildingReport> {
    reports.iter().fold(None, |best, report| match best {
        Some(b) if report.total_kwh <= b.total_kwh => Some(b),
        _ => Some(report),
    })
}

/// Campus-wide peak period: sum each period across buildings, then take the
/// maximum. Earliest period wins a tie.
fn peak_period(totals: &[PeriodTotal]) -> Option<Date> {
    let mut by_period: BTreeMap<Date, f64> = BTreeMap::new();
    for total in totals {
        *by_period.entry(total.period).or_insert(0.0) += total.kwh;
    }

    by_period
        .into_iter()
        .fold(None, |best, (period, kwh)| match best {
            Some((_, best_kwh)) if kwh <= best_kwh => best,
            _ => Some((period, kwh)),
        })
        .map(|(period, _)| period)
}

/// Render the summary text. Total functions only: an empty dataset yields a
/// report with zero consumption and no peak lines rather than a panic.
pub fn render_summary(
    generated_at: OffsetDateTime,
    merged: &[ReadingRow],
    buildings: &[BuildingReport],
    daily: &[PeriodTotal],
    weekly: &[PeriodTotal],
) -> String {
    // An empty `f64` sum is -0.0, which would print as "-0.00"; fold from
    // a positive zero instead.
    let total_campus: f64 = merged.iter().fold(0.0, |acc, r| acc + r.reading.kwh);

    let mut lines = Vec::new();
    lines.push("Campus Energy Usage Summary".to_string());
    lines.push(format!(
        "Generated: {}",
        generated_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| generated_at.to_string())
    ));
    lines.push(format!("Total campus consumption: {total_campus:.2} kWh"));

    if let Some(top) = top_building(buildings) {
        lines.push(format!(
            "Highest-consuming building: {} ({:.2} kWh)",
            top.building, top.total_kwh
        ));
    }
    if let Some(peak) = peak_reading(merged) {
        let ts = peak
            .reading
            .ts
            .format(&Rfc3339)
            .unwrap_or_else(|_| peak.reading.ts.to_string());
        lines.push(format!(
            "Peak load time: {ts} in {} ({:.2} kWh)",
            peak.building, peak.reading.kwh
        ));
    }
    if let Some(day) = peak_period(daily) {
        lines.push(format!("Day with highest total load: {day}"));
    }
    if let Some(week) = peak_period(weekly) {
        lines.push(format!("Week with highest total load (week ending): {week}"));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn write_summary_txt(path: &Path, contents: &str) -> Result<(), PipelineError> {
    fs::write(path, contents)
        .map_err(|e| PipelineError::Sink(format!("failed to write summary report: {e}")))
}
