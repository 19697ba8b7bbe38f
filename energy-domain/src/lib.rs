pub mod domain;

pub use domain::{BuildingSummary, MeterReading, PeriodTotal, ReadingRow};
