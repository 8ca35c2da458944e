//! JSON writers for aggregate points - one JSON array per run

use super::window::AggregatePoint;
use super::writer_backend::{AggregateSink, AggregatorWriterError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes the series as a JSON array to a file, truncating it on every write.
///
/// The file is only opened once the points are ready, so a run that fails
/// earlier leaves the previous output in place.
pub struct JsonFileWriter {
    path: PathBuf,
}

impl JsonFileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AggregateSink for JsonFileWriter {
    fn write_points(&mut self, points: &[AggregatePoint]) -> Result<(), AggregatorWriterError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(&mut writer, points)?;
        writer.flush()?;

        log::info!("📝 Wrote {} points to {}", points.len(), self.path.display());
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "JSON file"
    }
}

pub struct StdoutWriter;

impl AggregateSink for StdoutWriter {
    fn write_points(&mut self, points: &[AggregatePoint]) -> Result<(), AggregatorWriterError> {
        let mut out = std::io::stdout().lock();
        serde_json::to_writer(&mut out, points)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "stdout"
    }
}
