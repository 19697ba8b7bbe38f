use time::Date;

/// Summed consumption for one building within one resampling period.
///
/// `period` is the bucket label: the calendar day for daily totals, the
/// week-ending Sunday for weekly totals. Buckets with no readings produce
/// no row at all (sparse, never zero-filled).
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotal {
    pub building: String,
    pub period: Date,
    pub kwh: f64,
}

/// Per-building rollup over the whole merged dataset.
///
/// `total_kwh` is exactly the sum of that building's merged rows, modulo
/// floating-point accumulation order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingSummary {
    pub building: String,
    pub mean_kwh: f64,
    pub min_kwh: f64,
    pub max_kwh: f64,
    pub total_kwh: f64,
}
