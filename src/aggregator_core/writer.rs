//! Unified writer interface for aggregate points
//!
//! Routes writes to either a JSON file or stdout based on configuration.

use super::json_writer::{JsonFileWriter, StdoutWriter};
use super::window::AggregatePoint;
use super::writer_backend::{AggregateSink, AggregatorWriterError};
use crate::pipeline::config::OutputTarget;

/// Unified writer that routes to the configured backend
pub enum AggregatorWriter {
    File(JsonFileWriter),
    Stdout(StdoutWriter),
}

impl AggregatorWriter {
    pub fn new(target: &OutputTarget) -> Self {
        match target {
            OutputTarget::File(path) => AggregatorWriter::File(JsonFileWriter::new(path.clone())),
            OutputTarget::Stdout => AggregatorWriter::Stdout(StdoutWriter),
        }
    }
}

impl AggregateSink for AggregatorWriter {
    fn write_points(&mut self, points: &[AggregatePoint]) -> Result<(), AggregatorWriterError> {
        match self {
            AggregatorWriter::File(w) => w.write_points(points),
            AggregatorWriter::Stdout(w) => w.write_points(points),
        }
    }

    fn backend_type(&self) -> &'static str {
        match self {
            AggregatorWriter::File(w) => w.backend_type(),
            AggregatorWriter::Stdout(w) => w.backend_type(),
        }
    }
}
