use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to prepare log directory {0}: {1}")]
    LogDir(PathBuf, #[source] io::Error),

    #[error("Failed to open log file {0}: {1}")]
    LogFile(PathBuf, #[source] io::Error),

    #[error("Log directory is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("Invalid log file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to install log subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}
