//! Writer error types

use std::io;
use thiserror::Error;

/// Result type for writer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by construction, writing, and rotation
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration is missing a required field or names an unknown value
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The writer has been closed
    #[error("writer is closed")]
    Closed,

    /// The error channel only exists in the `async` write mode
    #[error("error channel is only available in the async write mode")]
    NotAsynchronous,

    /// Failed to read a configuration file
    #[error("failed to read config file '{path}'")]
    ConfigIo {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse a JSON configuration file
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// IO error from the write or rotation path
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::Closed => io::Error::new(io::ErrorKind::BrokenPipe, err),
            Error::InvalidConfig(_) | Error::NotAsynchronous => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            other => io::Error::other(other),
        }
    }
}
