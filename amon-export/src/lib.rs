pub mod assemble;
pub mod config;
pub mod identifiers;
pub mod metrics_server;
pub mod observability;
pub mod pipeline;
pub mod schema;
pub mod sinks;
pub mod sources;
pub mod transform;

pub use pipeline::{ExportSettings, Exporter, PipelineError, RunReport};
