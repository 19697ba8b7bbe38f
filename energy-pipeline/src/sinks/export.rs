//! Flat tabular exports of the merged dataset and its derived tables.
//! Timestamps are written as RFC 3339, periods as bare dates; the external
//! chart renderer consumes these files as-is.

use std::path::Path;

use energy_domain::{BuildingSummary, PeriodTotal, ReadingRow};
use time::{format_description::well_known::Rfc3339, macros::format_description};

use crate::pipeline::PipelineError;

fn sink_err(context: &str, e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Sink(format!("{context}: {e}"))
}

fn format_period(period: time::Date) -> Result<String, PipelineError> {
    period
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| sink_err("failed to format period", e))
}

/// Merged dataset export: building, timestamp, kwh, in merged order.
pub fn write_cleaned_csv(path: &Path, rows: &[ReadingRow]) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| sink_err("failed to create cleaned export", e))?;
    wtr.write_record(["building", "timestamp", "kwh"])
        .map_err(|e| sink_err("failed to write header", e))?;

    for row in rows {
        let ts = row
            .reading
            .ts
            .format(&Rfc3339)
            .map_err(|e| sink_err("failed to format timestamp", e))?;
        wtr.write_record([
            row.building.as_str(),
            ts.as_str(),
            row.reading.kwh.to_string().as_str(),
        ])
        .map_err(|e| sink_err("failed to write row", e))?;
    }

    wtr.flush().map_err(|e| sink_err("failed to flush cleaned export", e))
}

/// Per-building statistics export.
pub fn write_summary_csv(path: &Path, summary: &[BuildingSummary]) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| sink_err("failed to create summary export", e))?;
    wtr.write_record(["building", "mean_kwh", "min_kwh", "max_kwh", "total_kwh"])
        .map_err(|e| sink_err("failed to write header", e))?;

    for s in summary {
        wtr.write_record([
            s.building.as_str(),
            s.mean_kwh.to_string().as_str(),
            s.min_kwh.to_string().as_str(),
            s.max_kwh.to_string().as_str(),
            s.total_kwh.to_string().as_str(),
        ])
        .map_err(|e| sink_err("failed to write row", e))?;
    }

    wtr.flush().map_err(|e| sink_err("failed to flush summary export", e))
}

/// Daily or weekly totals export: building, period, kwh.
pub fn write_period_csv(path: &Path, totals: &[PeriodTotal]) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| sink_err("failed to create period export", e))?;
    wtr.write_record(["building", "period", "kwh"])
        .map_err(|e| sink_err("failed to write header", e))?;

    for total in totals {
        wtr.write_record([
            total.building.as_str(),
            format_period(total.period)?.as_str(),
            total.kwh.to_string().as_str(),
        ])
        .map_err(|e| sink_err("failed to write row", e))?;
    }

    wtr.flush().map_err(|e| sink_err("failed to flush period export", e))
}
