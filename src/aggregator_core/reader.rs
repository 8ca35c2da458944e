//! Newline-delimited JSON event loader

use super::error::{AggregationError, Result};
use super::normalizer::RawEvent;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

pub struct EventFileReader {
    path: PathBuf,
}

impl EventFileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load every record of the file into memory. Blank lines are skipped,
    /// any other line that is not a JSON object fails the whole read.
    pub fn read_all(&self) -> Result<Vec<RawEvent>> {
        if !self.path.is_file() {
            return Err(AggregationError::MissingFile {
                path: self.path.clone(),
            });
        }

        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        let mut events = Vec::new();

        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| self.io_error(source))?;
            if line.trim().is_empty() {
                continue;
            }
            let event = RawEvent::from_jsonl(&line).map_err(|source| {
                AggregationError::MalformedRecord {
                    line: idx + 1,
                    source,
                }
            })?;
            events.push(event);
        }

        log::info!("📖 Loaded {} records from {}", events.len(), self.path.display());
        Ok(events)
    }

    fn io_error(&self, source: std::io::Error) -> AggregationError {
        AggregationError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
