use std::path::{Path, PathBuf};
use std::sync::Arc;

use energy_domain::ReadingRow;
use tracing::{debug, warn};

use crate::config::ColumnConfig;
use crate::pipeline::{Pipeline, PipelineError};
use crate::sinks::collect::CollectSink;
use crate::sources::csv_readings::{ColumnLayout, CsvReadingSource};
use crate::transform::ReadingValidation;

/// Names the building a source's rows fall back to when the file carries no
/// building column. A trait so tests can substitute naming rules.
pub trait BuildingNamePolicy: Send + Sync {
    fn building_for(&self, source: &Path) -> String;
}

/// Default policy: the source file's stem.
#[derive(Debug, Default)]
pub struct FileStemPolicy;

impl BuildingNamePolicy for FileStemPolicy {
    fn building_for(&self, source: &Path) -> String {
        source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// One source's validated rows, in original file order.
#[derive(Debug)]
pub struct SourceTable {
    pub name: String,
    pub rows: Vec<ReadingRow>,
}

/// Result of a whole loading pass.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Per-source tables in enumeration order, each with at least one row.
    pub tables: Vec<SourceTable>,
    /// Human-readable messages for every skipped or empty source.
    pub diagnostics: Vec<String>,
    /// Rows dropped for unparseable or invalid values, across all sources.
    pub dropped_rows: u64,
}

impl LoadOutcome {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows.len()).sum()
    }
}

pub struct SourceLoader {
    data_dir: PathBuf,
    columns: ColumnConfig,
    policy: Box<dyn BuildingNamePolicy>,
}

impl SourceLoader {
    pub fn new<P: Into<PathBuf>>(data_dir: P, columns: ColumnConfig) -> Self {
        Self::with_policy(data_dir, columns, Box::new(FileStemPolicy))
    }

    pub fn with_policy<P: Into<PathBuf>>(
        data_dir: P,
        columns: ColumnConfig,
        policy: Box<dyn BuildingNamePolicy>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            columns,
            policy,
        }
    }

    /// Find all `.csv` files under the data directory, sorted by path so a
    /// run processes sources in a deterministic order.
    pub fn discover(&self) -> Vec<PathBuf> {
        if !self.data_dir.exists() {
            warn!("Data path does not exist: {}", self.data_dir.display());
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&self.data_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .map(|ext| ext == "csv")
                        .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();

        files.sort();
        files
    }

    /// Process every discovered source independently. A source that cannot
    /// be probed, or that keeps no valid rows, is skipped with one
    /// diagnostic; the run only fails when nothing at all survives.
    /// Diagnostics are returned for the caller to surface, not logged here
    /// beyond debug level.
    pub async fn load(&self) -> Result<LoadOutcome, PipelineError> {
        let mut tables: Vec<SourceTable> = Vec::new();
        let mut diagnostics: Vec<String> = Vec::new();
        let mut dropped_rows: u64 = 0;

        for path in self.discover() {
            let layout = match ColumnLayout::probe(&path, &self.columns) {
                Ok(layout) => layout,
                Err(e) => {
                    let msg = format!("skipped {}: {e}", path.display());
                    debug!("{msg}");
                    diagnostics.push(msg);
                    continue;
                }
            };

            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let fallback = self.policy.building_for(&path);
            let pipeline = Pipeline {
                source: CsvReadingSource::new(&path, layout, fallback),
                transforms: vec![Arc::new(ReadingValidation)],
                sink: CollectSink,
            };

            let collected = pipeline.run().await?;
            dropped_rows += collected.dropped;

            if collected.rows.is_empty() {
                let msg = format!("no valid readings in {}", path.display());
                debug!("{msg}");
                diagnostics.push(msg);
                continue;
            }

            debug!(
                source = %path.display(),
                rows = collected.rows.len(),
                dropped = collected.dropped,
                "loaded source"
            );
            tables.push(SourceTable {
                name,
                rows: collected.rows,
            });
        }

        if tables.is_empty() {
            return Err(PipelineError::NoData);
        }

        Ok(LoadOutcome {
            tables,
            diagnostics,
            dropped_rows,
        })
    }
}
