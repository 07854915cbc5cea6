//! Async write mode (`async`)
//!
//! Decouples callers from file I/O entirely: writes are copied into pooled
//! buffers and queued to a dedicated worker thread that drains them to the
//! file in order. The bounded queue is the backpressure point.
//!
//! Write failures happen on the worker, so they surface on the *next*
//! write call (and on the error channel) rather than the one whose bytes
//! failed; callers cannot correlate an error with a specific write. The
//! error channel is bounded to one slot with drop-oldest semantics, so a
//! slow error consumer can never stall the worker.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use bytes::BytesMut;
use crossbeam::channel::{Receiver, Sender, TrySendError, bounded};

use crate::error::{Error, Result};
use crate::trigger::RotationTrigger;
use crate::util::BufferPool;

use super::{RollingWriter, WriterCore};

/// Rolling writer with a background drain worker
pub struct AsynchronousWriter {
    core: Arc<WriterCore>,
    queue_tx: Sender<BytesMut>,
    queue_rx: Receiver<BytesMut>,
    err_tx: Sender<Error>,
    err_rx: Receiver<Error>,
    shutdown_tx: Sender<()>,
    closed: AtomicBool,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AsynchronousWriter {
    /// Wrap `core` and start the drain worker
    pub(crate) fn spawn(core: WriterCore) -> Result<Self> {
        let core = Arc::new(core);
        let (queue_tx, queue_rx) = bounded(core.config().queue_size);
        let (err_tx, err_rx) = bounded(1);
        let (shutdown_tx, shutdown_rx) = bounded(1);

        let worker = thread::Builder::new().name("logroll-drain".into()).spawn({
            let core = Arc::clone(&core);
            let queue_rx = queue_rx.clone();
            let err_tx = err_tx.clone();
            let err_rx = err_rx.clone();
            move || run_worker(&core, queue_rx, shutdown_rx, err_tx, err_rx)
        })?;

        Ok(Self {
            core,
            queue_tx,
            queue_rx,
            err_tx,
            err_rx,
            shutdown_tx,
            closed: AtomicBool::new(false),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Drain whatever is still queued, best effort, without ever blocking
    /// on the error channel
    fn drain(&self) {
        let pool = BufferPool::shared();
        while let Ok(buf) = self.queue_rx.try_recv() {
            match self.core.write_current(&buf) {
                Ok(_) => pool.put(buf),
                Err(e) => {
                    let abandoned = self.err_tx.try_send(e).is_err();
                    pool.put(buf);
                    if abandoned {
                        return;
                    }
                }
            }
        }
    }
}

impl RollingWriter for AsynchronousWriter {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Closed);
        }

        // a failure from an earlier queued write preempts this one; these
        // bytes are NOT enqueued
        if let Ok(err) = self.err_rx.try_recv() {
            return Err(err);
        }

        let pool = BufferPool::shared();
        if let Ok(dest) = self.core.fire.try_recv() {
            self.core.reopen(&dest)?;
            for chunk in buf.chunks(pool.buffer_capacity()) {
                let mut pooled = pool.get();
                pooled.extend_from_slice(chunk);
                self.queue_tx.send(pooled).map_err(|_| Error::Closed)?;
            }
            return Ok(buf.len());
        }

        let mut pooled = pool.get();
        pooled.extend_from_slice(buf);
        self.queue_tx.send(pooled).map_err(|_| Error::Closed)?;
        Ok(buf.len())
    }

    /// Stop the worker, drain the queue, close the handle
    ///
    /// Idempotent: the second call returns [`Error::Closed`] and does
    /// nothing.
    fn close(&self) -> Result<()> {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Closed);
        }

        let _ = self.shutdown_tx.try_send(());
        if let Some(worker) = self.worker.lock().ok().and_then(|mut w| w.take()) {
            let _ = worker.join();
        }

        self.drain();
        self.core.close_handle()
    }

    fn path(&self) -> &Path {
        self.core.path()
    }

    fn rotation_trigger(&self) -> RotationTrigger {
        self.core.trigger()
    }

    fn error_channel(&self) -> Result<Receiver<Error>> {
        Ok(self.err_rx.clone())
    }
}

impl std::io::Write for AsynchronousWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        RollingWriter::write(self, buf).map_err(std::io::Error::from)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// The drain worker: file writes happen here, in queue order
fn run_worker(
    core: &WriterCore,
    queue_rx: Receiver<BytesMut>,
    shutdown_rx: Receiver<()>,
    err_tx: Sender<Error>,
    err_rx: Receiver<Error>,
) {
    let pool = BufferPool::shared();
    loop {
        crossbeam::select! {
            recv(queue_rx) -> msg => match msg {
                Ok(buf) => {
                    if let Err(e) = core.write_current(&buf) {
                        report_error(&err_tx, &err_rx, e);
                    }
                    pool.put(buf);
                }
                Err(_) => return,
            },
            recv(shutdown_rx) -> _ => return,
        }
    }
}

/// Forward a worker failure, displacing an unread older error rather than
/// blocking
fn report_error(err_tx: &Sender<Error>, err_rx: &Receiver<Error>, err: Error) {
    if let Err(TrySendError::Full(err)) = err_tx.try_send(err) {
        if let Ok(stale) = err_rx.try_recv() {
            tracing::warn!(error = %stale, "dropping unread async write error");
        }
        let _ = err_tx.try_send(err);
    }
}

#[cfg(test)]
#[path = "asynchronous_test.rs"]
mod asynchronous_test;
