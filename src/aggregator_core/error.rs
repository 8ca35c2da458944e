use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AggregationError>;

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("input file does not exist: {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed timestamp {value:?}, expected YYYY-MM-DD HH:MM:SS.ffffff")]
    MalformedTimestamp { value: String },
    #[error("record has no timestamp: {record}")]
    MissingTimestamp { record: String },
    #[error("{record} is not a valid event entry ({reason})")]
    IntegrityViolation { record: String, reason: &'static str },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
