//! Pipeline configuration
//!
//! Built from command line arguments by the binary; library callers can
//! construct it directly.

use crate::aggregator_core::error::{AggregationError, Result};
use crate::aggregator_core::window::WindowSpec;
use std::path::PathBuf;

/// Where the series lands when no output is given.
pub const DEFAULT_OUTPUT_PATH: &str = "data.json";

/// Minutes between ticks when no frequency is given.
pub const DEFAULT_FREQUENCY_MINUTES: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
}

impl OutputTarget {
    /// `-` selects stdout, anything else is a file path.
    pub fn parse(value: &str) -> Self {
        if value == "-" {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(PathBuf::from(value))
        }
    }
}

impl Default for OutputTarget {
    fn default() -> Self {
        OutputTarget::File(PathBuf::from(DEFAULT_OUTPUT_PATH))
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Newline-delimited JSON event log
    pub input_path: PathBuf,

    /// Trailing window in minutes
    pub window_size_minutes: u32,

    /// Minutes between ticks
    pub frequency_minutes: u32,

    pub output: OutputTarget,

    /// Drop records that are not valid deliveries before aggregating.
    /// When unset, any such record aborts the run.
    pub skip_invalid: bool,
}

impl PipelineConfig {
    pub fn new(input_path: impl Into<PathBuf>, window_size_minutes: u32) -> Self {
        Self {
            input_path: input_path.into(),
            window_size_minutes,
            frequency_minutes: DEFAULT_FREQUENCY_MINUTES,
            output: OutputTarget::default(),
            skip_invalid: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.frequency_minutes == 0 {
            return Err(AggregationError::InvalidArgument(
                "frequency must be at least one minute".into(),
            ));
        }
        Ok(())
    }

    pub fn window_spec(&self) -> WindowSpec {
        WindowSpec::new(self.window_size_minutes).with_frequency(self.frequency_minutes)
    }
}
