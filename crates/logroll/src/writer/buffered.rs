//! Buffer write mode (`buffer`)
//!
//! Coalesces many small writes into one file write to amortize syscall
//! overhead. Appends never mutate a buffer another thread might be
//! reading: each append builds a new buffer and swaps the pointer.
//! Crossing the threshold flushes under a single-permit CAS flag; losers
//! skip rather than wait, and their bytes ride out with a later flush or
//! with close.
//!
//! A flush-path write failure is not surfaced to the caller (the append
//! already "succeeded"); it is logged. Close does surface its final write
//! error. Close is not safe to call concurrently with in-flight writes.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use bytes::BytesMut;

use crate::error::Result;
use crate::trigger::RotationTrigger;

use super::{RollingWriter, WriterCore};

/// Rolling writer that coalesces small writes
pub struct BufferedWriter {
    core: WriterCore,
    pending: ArcSwap<BytesMut>,
    flushing: AtomicBool,
}

impl BufferedWriter {
    pub(crate) fn new(core: WriterCore) -> Self {
        let pending = ArcSwap::from_pointee(Self::fresh_buffer(&core));
        Self {
            core,
            pending,
            flushing: AtomicBool::new(false),
        }
    }

    fn fresh_buffer(core: &WriterCore) -> BytesMut {
        BytesMut::with_capacity(core.config().buffer_threshold.saturating_mul(2))
    }

    /// Detach the pending buffer and write it out, regardless of threshold
    fn flush_pending(&self) -> Result<()> {
        let full = self.pending.swap(Arc::new(Self::fresh_buffer(&self.core)));
        if full.is_empty() {
            return Ok(());
        }
        self.core.write_current(&full).map(|_| ())
    }
}

impl RollingWriter for BufferedWriter {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        self.core.rotate_if_fired()?;

        // replace-don't-mutate; rcu retries the append if a concurrent
        // writer swapped first, so no byte is ever lost to a racing append
        self.pending.rcu(|current| {
            let mut next = BytesMut::with_capacity(current.len() + buf.len());
            next.extend_from_slice(current);
            next.extend_from_slice(buf);
            next
        });

        if self.pending.load().len() > self.core.config().buffer_threshold
            && self
                .flushing
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        {
            if let Err(e) = self.flush_pending() {
                // the append already succeeded from the caller's side
                tracing::error!(error = %e, "buffered flush failed");
            }
            self.flushing.store(false, Ordering::Release);
        }

        Ok(buf.len())
    }

    /// Write the remaining pending bytes, then close the handle
    fn close(&self) -> Result<()> {
        self.flush_pending()?;
        self.core.close_handle()
    }

    fn flush(&self) -> Result<()> {
        self.flush_pending()
    }

    fn path(&self) -> &Path {
        self.core.path()
    }

    fn rotation_trigger(&self) -> RotationTrigger {
        self.core.trigger()
    }
}

impl io::Write for BufferedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RollingWriter::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending().map_err(io::Error::from)
    }
}

#[cfg(test)]
#[path = "buffered_test.rs"]
mod buffered_test;
