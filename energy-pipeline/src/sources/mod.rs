pub mod csv_readings;
pub mod loader;

pub use csv_readings::CsvReadingSource;
pub use loader::{BuildingNamePolicy, FileStemPolicy, LoadOutcome, SourceLoader, SourceTable};
