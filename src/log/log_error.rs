use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to open log file {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no sink named {0:?}")]
    SinkNotFound(String),
    #[error("sink index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid time range: start {start} is after end {end}")]
    InvalidTimeRange { start: i64, end: i64 },
    #[error("invalid datetime: {0:?}")]
    InvalidDateTime(String),
    #[error("unknown log level: {0:?}")]
    UnknownLevel(String),
    #[error("unknown output option: {0:?}")]
    UnknownOption(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, LogError>;
