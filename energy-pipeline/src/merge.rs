use energy_domain::ReadingRow;

use crate::sources::SourceTable;

/// Concatenate per-source tables in enumeration order, then sort by
/// timestamp. The sort is stable, so rows with equal timestamps keep
/// source order first and original row order within a source.
///
/// Known limitation: two sources reporting the same (building, timestamp)
/// pair produce two distinct rows. Nothing deduplicates or last-writer-wins
/// here; see DESIGN.md before changing that.
pub fn merge_sources(tables: Vec<SourceTable>) -> Vec<ReadingRow> {
    let mut merged: Vec<ReadingRow> = tables.into_iter().flat_map(|t| t.rows).collect();
    merged.sort_by_key(|r| r.reading.ts);
    merged
}
