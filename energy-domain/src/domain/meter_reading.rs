use time::OffsetDateTime;

/// One validated (timestamp, kWh) observation. Immutable once constructed;
/// validation upstream guarantees `kwh` is finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterReading {
    pub ts: OffsetDateTime,
    pub kwh: f64,
}

/// A merged-dataset row: a reading attributed to exactly one building.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingRow {
    pub building: String,
    pub reading: MeterReading,
}

impl ReadingRow {
    pub fn new(building: impl Into<String>, ts: OffsetDateTime, kwh: f64) -> Self {
        Self {
            building: building.into(),
            reading: MeterReading { ts, kwh },
        }
    }
}
