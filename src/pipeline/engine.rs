//! Pipeline Engine - single pass over one event log
//!
//! ## Flow
//!
//! ```text
//! PipelineConfig.input_path
//!     ↓
//! EventFileReader::read_all()
//!     ↓
//! validate (only with skip_invalid)
//!     ↓
//! sort_events()
//!     ↓
//! TimeWindowAggregator::aggregate()
//!     ↓
//! AggregateSink::write_points()
//! ```
//!
//! Nothing is written unless every earlier step succeeded.

use super::config::PipelineConfig;
use crate::aggregator_core::error::AggregationError;
use crate::aggregator_core::normalizer::{validate, RawEvent};
use crate::aggregator_core::reader::EventFileReader;
use crate::aggregator_core::sorter::sort_events;
use crate::aggregator_core::window::TimeWindowAggregator;
use crate::aggregator_core::writer_backend::{AggregateSink, AggregatorWriterError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error("failed to write aggregate points: {0}")]
    Writer(#[from] AggregatorWriterError),
}

/// Counters for one completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub records_read: usize,
    pub records_skipped: usize,
    pub points_written: usize,
}

pub struct PipelineEngine {
    config: PipelineConfig,
    aggregator: TimeWindowAggregator,
}

impl PipelineEngine {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let aggregator = TimeWindowAggregator::new(config.window_spec())?;
        Ok(Self { config, aggregator })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the whole pipeline and hand the series to `sink`.
    pub fn run(&self, sink: &mut dyn AggregateSink) -> Result<RunSummary, PipelineError> {
        let records = EventFileReader::new(self.config.input_path.clone()).read_all()?;
        let records_read = records.len();

        let (events, records_skipped) = if self.config.skip_invalid {
            filter_deliveries(records)
        } else {
            (records, 0)
        };
        if records_skipped > 0 {
            log::warn!(
                "⚠️  Skipped {} of {} records that are not valid deliveries",
                records_skipped,
                records_read
            );
        }

        let events = sort_events(events)?;
        let points = self.aggregator.aggregate(&events)?;

        log::info!(
            "📊 Computed {} points (window: {}m, frequency: {}m) from {} events",
            points.len(),
            self.config.window_size_minutes,
            self.config.frequency_minutes,
            events.len()
        );

        sink.write_points(&points)?;

        Ok(RunSummary {
            records_read,
            records_skipped,
            points_written: points.len(),
        })
    }
}

/// Keep only records that pass `validate`, returning how many were dropped.
fn filter_deliveries(records: Vec<RawEvent>) -> (Vec<RawEvent>, usize) {
    let total = records.len();
    let kept: Vec<RawEvent> = records
        .into_iter()
        .filter(|record| {
            let valid = validate(record);
            if !valid {
                log::debug!("Skipping record: {}", record);
            }
            valid
        })
        .collect();
    let skipped = total - kept.len();
    (kept, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator_core::window::AggregatePoint;
    use std::io::Write;
    use std::path::PathBuf;

    const EVENTS: &str = concat!(
        r#"{"timestamp": "2018-12-26 18:11:08.509654","translation_id": "5aa5b2f39f7254a75aa5","source_language": "en","target_language": "fr","client_name": "easyjet","event_name": "translation_delivered","nr_words": 30, "duration": 20}"#,
        "\n",
        r#"{"timestamp": "2018-12-26 18:12:00.000000","translation_id": "5aa5b2f39f7254a75aa9","client_name": "easyjet","event_name": "translation_requested","nr_words": 12}"#,
        "\n",
        r#"{"timestamp": "2018-12-26 18:14:30.000000","translation_id": "5aa5b2f39f7254a75bb3","client_name": "booking","event_name": "translation_delivered","nr_words": 100, "duration": 40}"#,
        "\n",
    );

    fn write_events(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("events.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(EVENTS.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_run_skips_non_delivery_records_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::new(write_events(&dir), 10);
        config.skip_invalid = true;
        let engine = PipelineEngine::new(config).unwrap();

        let mut sink: Vec<AggregatePoint> = Vec::new();
        let summary = engine.run(&mut sink).unwrap();

        assert_eq!(
            summary,
            RunSummary {
                records_read: 3,
                records_skipped: 1,
                points_written: 5,
            }
        );
        // 18:11 .. 18:15
        assert_eq!(sink.len(), 5);
        assert_eq!(sink[0].average_delivery_time, 0.0);
        assert_eq!(sink[1].average_delivery_time, 20.0);
        assert_eq!(sink[4].average_delivery_time, 30.0);
    }

    #[test]
    fn test_default_run_aborts_on_invalid_record() {
        let dir = tempfile::tempdir().unwrap();
        let engine = PipelineEngine::new(PipelineConfig::new(write_events(&dir), 10)).unwrap();

        let mut sink: Vec<AggregatePoint> = Vec::new();
        let err = engine.run(&mut sink).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Aggregation(AggregationError::IntegrityViolation { .. })
        ));
        assert!(err.to_string().contains("translation_requested"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_input_propagates() {
        let engine = PipelineEngine::new(PipelineConfig::new("i/dont/exists", 10)).unwrap();
        let mut sink: Vec<AggregatePoint> = Vec::new();

        assert!(matches!(
            engine.run(&mut sink),
            Err(PipelineError::Aggregation(AggregationError::MissingFile { .. }))
        ));
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let mut config = PipelineConfig::new("events.json", 10);
        config.frequency_minutes = 0;
        assert!(PipelineEngine::new(config).is_err());
    }
}
