//! Aggregator Core - Windowed Delivery Time Engine
//!
//! Turns a log of translation events into a per-minute series of average
//! delivery durations over a trailing window.
//!
//! # Architecture
//!
//! ```text
//! NDJSON file → EventFileReader → RawEvent
//!     ↓
//! validate (drop non-delivery records)
//!     ↓
//! sort_events (stable, by timestamp)
//!     ↓
//! TimeWindowAggregator (one AggregatePoint per tick)
//!     ↓
//! AggregatorWriter → JSON array file or stdout
//! ```

pub mod error;
pub mod json_writer;
pub mod normalizer;
pub mod reader;
pub mod sorter;
pub mod window;
pub mod writer;
pub mod writer_backend;

pub use error::{AggregationError, Result};
pub use json_writer::{JsonFileWriter, StdoutWriter};
pub use normalizer::{parse_timestamp, validate, DeliveryEvent, RawEvent};
pub use reader::EventFileReader;
pub use sorter::sort_events;
pub use window::{
    in_window, truncate_to_minute, AggregatePoint, TimeWindowAggregator, WindowAccumulator,
    WindowSpec,
};
pub use writer::AggregatorWriter;
pub use writer_backend::{AggregateSink, AggregatorWriterError};
