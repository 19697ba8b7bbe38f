//! End-to-end runs over real temp directories: three-source campus
//! scenario, fatal no-data handling, and output files.

use std::fs;
use std::path::Path;

use energy_pipeline::aggregate;
use energy_pipeline::config::{ColumnConfig, OutputConfig};
use energy_pipeline::merge::merge_sources;
use energy_pipeline::pipeline::PipelineError;
use energy_pipeline::registry::BuildingRegistry;
use energy_pipeline::sinks::{export, report};
use energy_pipeline::sources::SourceLoader;
use time::macros::datetime;

/// Source A: 24 valid hourly rows, 5.0 kWh each.
fn write_source_a(dir: &Path) {
    let mut contents = String::from("timestamp,kwh\n");
    for hour in 0..24 {
        contents.push_str(&format!("2024-03-01 {hour:02}:00:00,5.0\n"));
    }
    fs::write(dir.join("a.csv"), contents).unwrap();
}

/// Source B: one malformed timestamp, one valid 10.0 kWh row.
fn write_source_b(dir: &Path) {
    fs::write(
        dir.join("b.csv"),
        "timestamp,kwh\nlast tuesday,3.0\n2024-03-01 12:30:00,10.0\n",
    )
    .unwrap();
}

/// Source C: unreadable; the header row is not valid UTF-8.
fn write_source_c(dir: &Path) {
    fs::write(dir.join("c.csv"), [0xff, 0xfe, 0x00, 0x41]).unwrap();
}

#[tokio::test]
async fn three_source_campus_scenario() {
    let data = tempfile::tempdir().unwrap();
    write_source_a(data.path());
    write_source_b(data.path());
    write_source_c(data.path());

    let loader = SourceLoader::new(data.path(), ColumnConfig::default());
    let outcome = loader.load().await.unwrap();

    // B keeps its good row, so only C is skipped wholesale.
    assert_eq!(outcome.diagnostics.len(), 1);
    assert!(outcome.diagnostics[0].contains("c.csv"));
    assert_eq!(outcome.dropped_rows, 1);

    let merged = merge_sources(outcome.tables);
    assert_eq!(merged.len(), 25);

    // Chronologically ordered: B's 12:30 reading sits between A's hours.
    assert!(merged.windows(2).all(|w| w[0].reading.ts <= w[1].reading.ts));
    assert_eq!(merged[13].building, "b");
    assert_eq!(merged[13].reading.ts, datetime!(2024-03-01 12:30:00 UTC));

    let summary = aggregate::building_summary(&merged);
    assert_eq!(summary.len(), 2);

    let a = &summary[0];
    assert_eq!(a.building, "a");
    assert_eq!(a.total_kwh, 120.0);
    assert_eq!(a.mean_kwh, 5.0);
    assert_eq!(a.min_kwh, 5.0);
    assert_eq!(a.max_kwh, 5.0);

    let b = &summary[1];
    assert_eq!(b.building, "b");
    assert_eq!(b.total_kwh, 10.0);
    assert_eq!(b.mean_kwh, 10.0);
    assert_eq!(b.min_kwh, 10.0);
    assert_eq!(b.max_kwh, 10.0);

    // The accumulator path agrees on totals and maxima.
    let registry = BuildingRegistry::from_rows(&merged);
    let reports = registry.report_table();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].total_kwh, 120.0);
    assert_eq!(reports[1].max_kwh, 10.0);
}

#[tokio::test]
async fn no_valid_data_is_fatal_and_writes_nothing() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(data.path().join("junk.csv"), "foo,bar\n1,2\n").unwrap();

    let loader = SourceLoader::new(data.path(), ColumnConfig::default());
    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, PipelineError::NoData));

    // The fatal path stops before any export runs.
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn full_run_writes_every_output_file() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_source_a(data.path());
    write_source_b(data.path());

    let loader = SourceLoader::new(data.path(), ColumnConfig::default());
    let outcome = loader.load().await.unwrap();
    let merged = merge_sources(outcome.tables);

    let daily = aggregate::daily_totals(&merged);
    let weekly = aggregate::weekly_totals(&merged);
    let summary = aggregate::building_summary(&merged);
    let registry = BuildingRegistry::from_rows(&merged);

    let output = OutputConfig {
        dir: out.path().to_path_buf(),
        ..OutputConfig::default()
    };

    export::write_cleaned_csv(&output.cleaned_path(), &merged).unwrap();
    export::write_summary_csv(&output.summary_csv_path(), &summary).unwrap();
    export::write_period_csv(&output.daily_path(), &daily).unwrap();
    export::write_period_csv(&output.weekly_path(), &weekly).unwrap();

    let text = report::render_summary(
        datetime!(2024-03-05 00:00:00 UTC),
        &merged,
        &registry.report_table(),
        &daily,
        &weekly,
    );
    report::write_summary_txt(&output.summary_txt_path(), &text).unwrap();

    for path in [
        output.cleaned_path(),
        output.summary_csv_path(),
        output.daily_path(),
        output.weekly_path(),
        output.summary_txt_path(),
    ] {
        assert!(path.exists(), "missing output {}", path.display());
    }

    let summary_text = fs::read_to_string(output.summary_txt_path()).unwrap();
    assert!(summary_text.contains("Total campus consumption: 130.00 kWh"));
    assert!(summary_text.contains("Highest-consuming building: a (120.00 kWh)"));
    assert!(summary_text.contains("in b (10.00 kWh)"));
    assert!(summary_text.contains("Day with highest total load: 2024-03-01"));

    // Cleaned export has a header plus all 25 merged rows.
    let cleaned = fs::read_to_string(output.cleaned_path()).unwrap();
    assert_eq!(cleaned.lines().count(), 26);
}
