//! Rolling writer core
//!
//! The writer family shares one rotation/concurrency protocol and differs
//! only in write-path discipline:
//!
//! ```text
//! [write()] → [trigger poll] → [reopen?] → [strategy path] → [file handle]
//!                                  ↓ (rotation)
//!                       [ArcSwapOption::swap(new handle)]
//!                                  ↓
//!                  [completion thread: gzip → retention notify]
//!                                  ↓
//!                  [old handle closes via Arc refcount]
//! ```
//!
//! The active handle lives in an [`arc_swap::ArcSwapOption`]; rotation
//! replaces it with a single atomic swap, so no write path ever takes a
//! lock and no reader ever observes a half-built handle. The detached old
//! handle stays open until the completion thread (and any write still
//! holding it) lets the last `Arc` go.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use arc_swap::ArcSwapOption;
use crossbeam::channel::{Receiver, Sender, unbounded};

use crate::compress;
use crate::config::{Config, WriteMode};
use crate::error::{Error, Result};
use crate::retention;
use crate::trigger::{self, RotationTrigger};

mod asynchronous;
mod buffered;
mod locked;
mod plain;

pub use asynchronous::AsynchronousWriter;
pub use buffered::BufferedWriter;
pub use locked::LockedWriter;
pub use plain::PlainWriter;

/// The public writer contract shared by all four write modes
///
/// `write` and `close` take `&self`: the whole point of the rotation
/// protocol is that callers may share one writer across threads without
/// a mutex.
pub trait RollingWriter: Send + Sync {
    /// Append `buf` to the sink, rotating first if a trigger is pending
    fn write(&self, buf: &[u8]) -> Result<usize>;

    /// Close the writer
    ///
    /// Idempotent only in the `async` mode; see the mode docs.
    fn close(&self) -> Result<()>;

    /// Push any coalesced bytes down to the file
    ///
    /// Only the `buffer` mode holds bytes back; everywhere else this is a
    /// no-op.
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Absolute path of the live file
    fn path(&self) -> &Path;

    /// Handle the external rotation policy engine fires triggers through
    fn rotation_trigger(&self) -> RotationTrigger;

    /// Receiver for background write failures
    ///
    /// Only the `async` mode reports asynchronously; every other mode
    /// returns [`Error::NotAsynchronous`].
    fn error_channel(&self) -> Result<Receiver<Error>> {
        Err(Error::NotAsynchronous)
    }
}

/// Build a writer from a populated configuration record
///
/// Validates the config, creates the log directory if absent, opens the
/// live file, wires the rotation-trigger channel, and starts the retention
/// loop (all modes except `async`, which leaves retention to the caller's
/// lifetime as the source system did).
pub fn from_config(config: Config) -> Result<Box<dyn RollingWriter>> {
    config.validate()?;
    fs::create_dir_all(&config.log_path)?;

    let path = config.log_file_path();
    let file = open_log_file(&path)?;

    let (trigger, fire) = trigger::trigger_channel();
    let (rotated_tx, rotated_rx) = unbounded();

    let core = WriterCore {
        file: ArcSwapOption::new(Some(Arc::new(file))),
        path,
        fire,
        trigger,
        rotated_tx,
        config,
    };

    let writer: Box<dyn RollingWriter> = match core.config.write_mode {
        WriteMode::None => {
            retention::spawn(rotated_rx, core.config.max_remain)?;
            Box::new(PlainWriter::new(core))
        }
        WriteMode::Lock => {
            retention::spawn(rotated_rx, core.config.max_remain)?;
            Box::new(LockedWriter::new(core))
        }
        WriteMode::Async => Box::new(AsynchronousWriter::spawn(core)?),
        WriteMode::Buffer => {
            retention::spawn(rotated_rx, core.config.max_remain)?;
            Box::new(BufferedWriter::new(core))
        }
    };

    Ok(writer)
}

/// Build a writer from a JSON configuration file
pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Box<dyn RollingWriter>> {
    from_config(Config::from_file(path)?)
}

impl io::Write for Box<dyn RollingWriter> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RollingWriter::write(self.as_ref(), buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        RollingWriter::flush(self.as_ref()).map_err(io::Error::from)
    }
}

/// Open the live file: create-if-absent, append, readable
///
/// Readable because background compression reads the rotated content back
/// through this same handle after the rename.
pub(crate) fn open_log_file(path: &Path) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.read(true).append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o644);
    }
    opts.open(path)
}

/// State shared by every write mode
pub(crate) struct WriterCore {
    /// Active file handle; `None` once closed
    file: ArcSwapOption<File>,

    /// Absolute path of the live file
    path: PathBuf,

    /// Rotation-trigger input (destination paths, serviced in order)
    fire: Receiver<PathBuf>,

    /// Sender side of `fire`, handed out to the policy engine
    trigger: RotationTrigger,

    /// Rotated-file output consumed by the retention loop
    rotated_tx: Sender<PathBuf>,

    /// Static configuration snapshot
    config: Config,
}

impl WriterCore {
    /// Non-blocking trigger poll; rotates at most once per call
    pub(crate) fn rotate_if_fired(&self) -> Result<()> {
        if let Ok(dest) = self.fire.try_recv() {
            self.reopen(&dest)?;
        }
        Ok(())
    }

    /// The rotation protocol
    ///
    /// Rename the live file to `dest`, open a fresh file at the live path,
    /// atomically swap the handle, and hand the detached old handle to a
    /// background completion thread (compression, retention notify, close).
    /// A failure before the swap leaves the writer on its old handle with
    /// nothing renamed out from under it that it still needs.
    pub(crate) fn reopen(&self, dest: &Path) -> Result<()> {
        fs::rename(&self.path, dest)?;
        let file = open_log_file(&self.path)?;
        let old = self.file.swap(Some(Arc::new(file)));

        let dest = dest.to_path_buf();
        let compress_enabled = self.config.compress;
        let rotated_tx = self.rotated_tx.clone();
        thread::Builder::new()
            .name("logroll-rotate".into())
            .spawn(move || finish_rotation(old, dest, compress_enabled, rotated_tx))?;

        Ok(())
    }

    /// Write through a borrowed load of the active handle
    pub(crate) fn write_current(&self, buf: &[u8]) -> Result<usize> {
        let guard = self.file.load();
        match guard.as_ref() {
            Some(file) => {
                let mut file: &File = file;
                Ok(file.write(buf)?)
            }
            None => Err(Error::Closed),
        }
    }

    /// Take an owned reference to the active handle
    ///
    /// The returned `Arc` keeps the file open across a concurrent rotation
    /// or close, so a write already in flight always completes on a valid
    /// descriptor.
    pub(crate) fn load_handle(&self) -> Result<Arc<File>> {
        self.file.load_full().ok_or(Error::Closed)
    }

    /// Detach the active handle; it closes when the last owner drops it
    pub(crate) fn close_handle(&self) -> Result<()> {
        self.file.swap(None);
        Ok(())
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn trigger(&self) -> RotationTrigger {
        self.trigger.clone()
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }
}

/// Rotation completion, detached from the triggering write
///
/// Compresses the rotated file if configured, notifies retention, and drops
/// the old handle last so compression can read through it.
fn finish_rotation(
    old: Option<Arc<File>>,
    dest: PathBuf,
    compress_enabled: bool,
    rotated_tx: Sender<PathBuf>,
) {
    if compress_enabled {
        let tmp = compress::tmp_path(&dest);
        if let Err(e) = fs::rename(&dest, &tmp) {
            tracing::error!(
                path = %dest.display(),
                error = %e,
                "failed to stage rotated file for compression"
            );
            return;
        }

        let Some(file) = old.as_ref() else {
            return;
        };
        if let Err(e) = compress::compress_file(file, &dest) {
            tracing::error!(
                path = %dest.display(),
                error = %e,
                "failed to compress rotated log file"
            );
            return;
        }
    }

    // no retention loop runs in the async mode; a dropped receiver is fine
    let _ = rotated_tx.send(dest);
}
