//! Lock mode (`lock`)
//!
//! Same contract as the plain mode, but each write takes an owned reference
//! to the active handle. This is the minimum synchronization that makes
//! concurrent writers safe without a mutex: a rotation mid-write swaps the
//! slot, and the in-flight write simply finishes on the still-open old
//! handle before the refcount lets it close.

use std::io::{self, Write as _};
use std::path::Path;

use crate::error::Result;
use crate::trigger::RotationTrigger;

use super::{RollingWriter, WriterCore};

/// Rolling writer safe for concurrent callers
pub struct LockedWriter {
    core: WriterCore,
}

impl LockedWriter {
    pub(crate) fn new(core: WriterCore) -> Self {
        Self { core }
    }
}

impl RollingWriter for LockedWriter {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        self.core.rotate_if_fired()?;
        let file = self.core.load_handle()?;
        let mut file = file.as_ref();
        Ok(file.write(buf)?)
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

impl io::Write for LockedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RollingWriter::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
