pub mod aggregates;
pub mod meter_reading;

pub use aggregates::{BuildingSummary, PeriodTotal};
pub use meter_reading::{MeterReading, ReadingRow};
