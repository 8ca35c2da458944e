//! Writer backend trait for aggregate points
//!
//! Defines where a finished series goes. The aggregator itself never touches
//! the filesystem; the pipeline hands the points to a sink.

use super::window::AggregatePoint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregatorWriterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Backend trait for persisting a complete aggregate series
pub trait AggregateSink {
    /// Write the full series, replacing anything written before
    fn write_points(&mut self, points: &[AggregatePoint]) -> Result<(), AggregatorWriterError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}

impl AggregateSink for Vec<AggregatePoint> {
    fn write_points(&mut self, points: &[AggregatePoint]) -> Result<(), AggregatorWriterError> {
        self.clear();
        self.extend_from_slice(points);
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}
