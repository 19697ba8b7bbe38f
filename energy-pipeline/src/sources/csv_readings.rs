use std::{
    fs::File,
    path::{Path, PathBuf},
};

use csv::StringRecord;
use energy_domain::ReadingRow;
use futures::Stream;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

use crate::config::ColumnConfig;
use crate::pipeline::{Envelope, PipelineError, Source};

/// CSV source for meter readings.
///
/// Expected header columns (by configured name, default shown):
/// - timestamp (RFC 3339, `YYYY-MM-DD HH:MM:SS`, or bare date)
/// - kwh
/// - building (optional; rows without it get the source's fallback name)
pub struct CsvReadingSource {
    path: PathBuf,
    layout: ColumnLayout,
    fallback_building: String,
}

/// Header positions resolved during the probe step.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    timestamp: usize,
    kwh: usize,
    building: Option<usize>,
}

impl ColumnLayout {
    /// Open `path` and resolve the configured column names against its
    /// header row. An unreadable file or a header without both required
    /// columns is a source-level failure; the caller skips the whole file.
    pub fn probe(path: &Path, columns: &ColumnConfig) -> Result<Self, PipelineError> {
        let file = File::open(path)
            .map_err(|e| PipelineError::Source(format!("failed to open {}: {e}", path.display())))?;
        let mut rdr = csv::Reader::from_reader(file);
        let headers = rdr
            .headers()
            .map_err(|e| PipelineError::Source(format!("failed to read CSV headers: {e}")))?;

        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let timestamp = find(&columns.timestamp).ok_or_else(|| {
            PipelineError::Source(format!("missing '{}' column", columns.timestamp))
        })?;
        let kwh = find(&columns.kwh)
            .ok_or_else(|| PipelineError::Source(format!("missing '{}' column", columns.kwh)))?;
        let building = find(&columns.building);

        Ok(Self {
            timestamp,
            kwh,
            building,
        })
    }
}

impl CsvReadingSource {
    pub fn new<P: Into<PathBuf>>(path: P, layout: ColumnLayout, fallback_building: String) -> Self {
        Self {
            path: path.into(),
            layout,
            fallback_building,
        }
    }
}

/// Permissive timestamp parse: RFC 3339 first, then a naive datetime
/// (assumed UTC), then a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(ts) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(ts);
    }
    let naive = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    if let Ok(dt) = PrimitiveDateTime::parse(s, naive) {
        return Some(dt.assume_utc());
    }
    let naive_t = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(dt) = PrimitiveDateTime::parse(s, naive_t) {
        return Some(dt.assume_utc());
    }
    let date_only = format_description!("[year]-[month]-[day]");
    if let Ok(d) = Date::parse(s, date_only) {
        return Some(d.midnight().assume_utc());
    }
    None
}

fn record_to_reading(
    record: &StringRecord,
    layout: &ColumnLayout,
    fallback_building: &str,
    row: u64,
) -> Result<ReadingRow, PipelineError> {
    let ts_str = record
        .get(layout.timestamp)
        .ok_or_else(|| PipelineError::Source(format!("row {row}: missing timestamp field")))?;
    let ts = parse_timestamp(ts_str)
        .ok_or_else(|| PipelineError::Source(format!("row {row}: invalid timestamp '{ts_str}'")))?;

    let kwh_str = record
        .get(layout.kwh)
        .ok_or_else(|| PipelineError::Source(format!("row {row}: missing kwh field")))?;
    let kwh: f64 = kwh_str
        .trim()
        .parse()
        .map_err(|e| PipelineError::Source(format!("row {row}: invalid kwh '{kwh_str}': {e}")))?;

    let building = layout
        .building
        .and_then(|idx| record.get(idx))
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(fallback_building);

    Ok(ReadingRow::new(building, ts, kwh))
}

#[async_trait::async_trait]
impl Source<ReadingRow> for CsvReadingSource {
    async fn stream(
        &self,
    ) -> std::pin::Pin<Box<dyn Stream<Item = Result<Envelope<ReadingRow>, PipelineError>> + Send>>
    {
        // Blocking CSV reader wrapped in a single async task; inputs are
        // small local files. A bad row yields an error item and the stream
        // keeps going, so one malformed line never costs its neighbours.
        let path = self.path.clone();
        let layout = self.layout.clone();
        let fallback = self.fallback_building.clone();
        let s = async_stream::stream! {
            match File::open(&path) {
                Err(e) => {
                    yield Err(PipelineError::Source(format!(
                        "failed to open {}: {e}", path.display()
                    )));
                }
                Ok(file) => {
                    let mut rdr = csv::Reader::from_reader(file);

                    let mut row: u64 = 0;
                    for result in rdr.records() {
                        row += 1;
                        let record = match result {
                            Ok(r) => r,
                            Err(e) => {
                                metrics::counter!("csv_parse_errors_total").increment(1);
                                yield Err(PipelineError::Source(format!(
                                    "row {row}: bad CSV record: {e}"
                                )));
                                continue;
                            }
                        };

                        match record_to_reading(&record, &layout, &fallback, row) {
                            Ok(reading) => yield Ok(Envelope { payload: reading, row }),
                            Err(e) => {
                                metrics::counter!("csv_parse_errors_total").increment(1);
                                yield Err(e);
                            }
                        }
                    }
                }
            }
        };

        Box::pin(s)
    }
}
