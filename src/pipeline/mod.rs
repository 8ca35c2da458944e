//! Batch pipeline: load, filter, sort, aggregate, persist
//!
//! ```text
//! EventFileReader → validate → sort_events → TimeWindowAggregator → AggregateSink
//! ```

pub mod config;
pub mod engine;

pub use config::{OutputTarget, PipelineConfig, DEFAULT_FREQUENCY_MINUTES, DEFAULT_OUTPUT_PATH};
pub use engine::{PipelineEngine, PipelineError, RunSummary};
