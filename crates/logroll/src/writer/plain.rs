//! Plain write mode (`none`)
//!
//! No write-path synchronization beyond the handle slot itself: one load
//! per call, straight through to the file. Intended for callers that
//! guarantee non-concurrent use; concurrent callers should pick the `lock`
//! mode, which pins the handle it writes to.

use std::io;
use std::path::Path;

use crate::error::Result;
use crate::trigger::RotationTrigger;

use super::{RollingWriter, WriterCore};

/// Unsynchronized rolling writer
pub struct PlainWriter {
    core: WriterCore,
}

impl PlainWriter {
    pub(crate) fn new(core: WriterCore) -> Self {
        Self { core }
    }
}

impl RollingWriter for PlainWriter {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        self.core.rotate_if_fired()?;
        self.core.write_current(buf)
    }

    fn close(&self) -> Result<()> {
        self.core.close_handle()
    }

    fn path(&self) -> &Path {
        self.core.path()
    }

    fn rotation_trigger(&self) -> RotationTrigger {
        self.core.trigger()
    }
}

impl io::Write for PlainWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RollingWriter::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
