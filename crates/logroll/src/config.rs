//! Writer configuration
//!
//! Configuration for the rolling writer with sensible defaults. Minimal
//! config should just work - only specify what you need to change.
//!
//! Three surfaces funnel into the same [`Config`] record:
//!
//! - a fully populated struct literal,
//! - `Config::default()` refined with the `with_*` builders,
//! - a JSON file loaded via [`Config::from_file`].
//!
//! # Example JSON Config
//!
//! ```json
//! {
//!     "log_path": "/var/log/app",
//!     "file_name": "app",
//!     "write_mode": "async",
//!     "max_remain": 7,
//!     "compress": true
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default write queue capacity for the `async` mode (in pooled chunks)
pub const DEFAULT_QUEUE_SIZE: usize = 1024;

/// Default pending-buffer flush threshold for the `buffer` mode, in bytes
pub const DEFAULT_BUFFER_THRESHOLD: usize = 8 * 1024;

/// Write-path discipline used by the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// No write-path synchronization; single-threaded callers only
    None,

    /// Atomic handle load per write; safe for concurrent callers
    Lock,

    /// Queue writes to a dedicated background worker
    Async,

    /// Coalesce small writes into one buffer, flushed past a threshold
    Buffer,
}

impl WriteMode {
    /// Get the mode name as it appears in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Lock => "lock",
            Self::Async => "async",
            Self::Buffer => "buffer",
        }
    }
}

/// Configuration for a rolling writer
///
/// All fields have defaults; an empty JSON object is a valid config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the live file and rotated files are written into
    pub log_path: PathBuf,

    /// Base name of the live file; the writer appends `.log`
    pub file_name: String,

    /// Write-path discipline
    pub write_mode: WriteMode,

    /// Rotated files to retain; negative disables eviction entirely
    pub max_remain: i32,

    /// Gzip rotated files in the background
    pub compress: bool,

    /// Queue capacity for the `async` mode
    pub queue_size: usize,

    /// Pending-buffer flush threshold for the `buffer` mode, in bytes
    pub buffer_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("./log"),
            file_name: "log".into(),
            write_mode: WriteMode::Lock,
            max_remain: -1,
            compress: false,
            queue_size: DEFAULT_QUEUE_SIZE,
            buffer_threshold: DEFAULT_BUFFER_THRESHOLD,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| Error::ConfigIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Set the log directory
    #[must_use]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Set the base file name
    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Set the write mode
    #[must_use]
    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    /// Set the retention cap; negative retains everything
    #[must_use]
    pub fn with_max_remain(mut self, max_remain: i32) -> Self {
        self.max_remain = max_remain;
        self
    }

    /// Enable gzip compression of rotated files
    #[must_use]
    pub fn with_compress(mut self) -> Self {
        self.compress = true;
        self
    }

    /// Set the async-mode queue capacity
    #[must_use]
    pub fn with_queue_size(mut self, size: usize) -> Self {
        self.queue_size = size;
        self
    }

    /// Set the buffer-mode flush threshold in bytes
    #[must_use]
    pub fn with_buffer_threshold(mut self, bytes: usize) -> Self {
        self.buffer_threshold = bytes;
        self
    }

    /// Check that the required fields are populated
    pub(crate) fn validate(&self) -> Result<()> {
        if self.log_path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("log_path must not be empty"));
        }
        if self.file_name.is_empty() {
            return Err(Error::InvalidConfig("file_name must not be empty"));
        }
        Ok(())
    }

    /// Absolute path of the live file: `<log_path>/<file_name>.log`
    pub fn log_file_path(&self) -> PathBuf {
        self.log_path.join(format!("{}.log", self.file_name))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
