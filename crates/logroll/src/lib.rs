//! logroll - rolling file writer
//!
//! An append-only byte sink that transparently rotates its backing file on
//! an external trigger, retains only the most recent N rotated files, and
//! optionally gzips rotated files in the background - all without blocking
//! the write path on rotation I/O.
//!
//! # Architecture
//!
//! ```text
//! [caller] → [writer.write()] → [trigger poll] → [file handle]
//!                                     ↓ (trigger pending)
//!                          [reopen: rename → open → atomic swap]
//!                                     ↓
//!                     [completion thread: gzip → retention notify]
//!                                     ↓
//!                     [retention loop: evict oldest past the cap]
//! ```
//!
//! The active handle is hot-swapped with `ArcSwap`; writers never take a
//! lock and never stall on compression or deletion.
//!
//! # Write Modes
//!
//! | Mode | Discipline | Concurrent callers |
//! |------|-----------|--------------------|
//! | `none` | single handle load, straight through | No |
//! | `lock` | owned handle reference per write | Yes |
//! | `async` | pooled copy, queued to a drain worker | Yes |
//! | `buffer` | coalesce into a pending buffer, flush past threshold | Yes |
//!
//! # Example
//!
//! ```ignore
//! use logroll::{Config, WriteMode, from_config};
//!
//! let config = Config::default()
//!     .with_log_path("/var/log/app")
//!     .with_file_name("app")
//!     .with_write_mode(WriteMode::Lock)
//!     .with_max_remain(7)
//!     .with_compress();
//!
//! let writer = from_config(config)?;
//! writer.write(b"hello\n")?;
//!
//! // an external policy engine decides when to rotate
//! let trigger = writer.rotation_trigger();
//! trigger.fire("/var/log/app/app.2026-08-07.log.gz");
//! ```

mod compress;
mod config;
mod error;
mod retention;
mod trigger;
mod writer;

/// Shared low-level utilities (buffer pool)
pub mod util;

pub use config::{Config, DEFAULT_BUFFER_THRESHOLD, DEFAULT_QUEUE_SIZE, WriteMode};
pub use error::{Error, Result};
pub use trigger::RotationTrigger;
pub use writer::{
    AsynchronousWriter, BufferedWriter, LockedWriter, PlainWriter, RollingWriter, from_config,
    from_config_file,
};
