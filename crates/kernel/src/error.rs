use std::io;

/// Represents all possible errors that can occur in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host's device enumeration could not be reached.
    ///
    /// Presence cannot be determined without it, so this aborts the run.
    #[error("Device enumeration unavailable: {0}")]
    EnumerationUnavailable(String),

    /// Error occurred while reading or writing the last-success record.
    #[error("Failed to access timestamp record: {0}")]
    Store(#[from] io::Error),

    /// The recovery command could not be started.
    #[error("Failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    /// An empty device pattern would match every device.
    #[error("Device pattern must not be empty")]
    EmptyPattern,
}
