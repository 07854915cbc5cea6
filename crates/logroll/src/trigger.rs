//! Rotation-trigger boundary
//!
//! The writer never decides *when* to rotate. An external policy engine
//! (time-based, size-based, an operator signal) fires triggers through a
//! [`RotationTrigger`] handle; each trigger carries the destination path the
//! live file should be renamed to. Triggers are serviced in the order fired,
//! one per write call, and are never coalesced.

use std::path::PathBuf;

use crossbeam::channel::{Receiver, Sender, unbounded};

/// Handle used to request a rotation
///
/// Cloneable; clones share the same writer. Firing never blocks.
#[derive(Debug, Clone)]
pub struct RotationTrigger {
    tx: Sender<PathBuf>,
}

impl RotationTrigger {
    /// Request a rotation, renaming the live file to `dest`
    ///
    /// Returns `false` if the writer side is gone and the trigger was
    /// dropped.
    pub fn fire(&self, dest: impl Into<PathBuf>) -> bool {
        self.tx.send(dest.into()).is_ok()
    }
}

/// Create the trigger channel pair consumed by a writer
pub(crate) fn trigger_channel() -> (RotationTrigger, Receiver<PathBuf>) {
    let (tx, rx) = unbounded();
    (RotationTrigger { tx }, rx)
}
