pub mod collect;
pub mod export;
pub mod report;

pub use collect::{CollectSink, Collected};
