use anyhow::Result;
use energy_pipeline::{
    aggregate,
    config::AppConfig,
    merge::merge_sources,
    observability,
    registry::BuildingRegistry,
    sinks::{export, report},
    sources::SourceLoader,
};
use time::OffsetDateTime;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Ingest every CSV source under the data directory. One malformed
    // source never aborts the run; zero usable sources does.
    let loader = SourceLoader::new(&cfg.data_dir, cfg.columns.clone());
    let outcome = loader.load().await?;

    for diagnostic in &outcome.diagnostics {
        warn!("{diagnostic}");
    }
    info!(
        sources = outcome.tables.len(),
        rows = outcome.total_rows(),
        dropped = outcome.dropped_rows,
        "finished loading sources"
    );

    let merged = merge_sources(outcome.tables);

    // Derived views: both the table path and the accumulator path come
    // straight from the merged dataset.
    let daily = aggregate::daily_totals(&merged);
    let weekly = aggregate::weekly_totals(&merged);
    let summary = aggregate::building_summary(&merged);
    let registry = BuildingRegistry::from_rows(&merged);

    std::fs::create_dir_all(&cfg.output.dir)?;

    export::write_cleaned_csv(&cfg.output.cleaned_path(), &merged)?;
    export::write_summary_csv(&cfg.output.summary_csv_path(), &summary)?;
    export::write_period_csv(&cfg.output.daily_path(), &daily)?;
    export::write_period_csv(&cfg.output.weekly_path(), &weekly)?;

    let text = report::render_summary(
        OffsetDateTime::now_utc(),
        &merged,
        &registry.report_table(),
        &daily,
        &weekly,
    );
    report::write_summary_txt(&cfg.output.summary_txt_path(), &text)?;
    info!("{text}");

    info!(output_dir = %cfg.output.dir.display(), "all outputs written");

    Ok(())
}
