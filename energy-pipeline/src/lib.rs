pub mod pipeline;
pub mod config;
pub mod sources;
pub mod sinks;
pub mod transform;
pub mod merge;
pub mod aggregate;
pub mod registry;
pub mod observability;

pub use pipeline::{Pipeline, Envelope};
