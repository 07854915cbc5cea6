//! Rotated-file retention
//!
//! A background loop consumes rotated-file notifications in rotation order
//! and deletes the oldest entries once the retention cap is exceeded. The
//! list is owned by this loop alone; nothing else mutates it.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam::channel::Receiver;

/// Spawn the retention loop for one writer instance
///
/// `max_remain` is the number of rotated files to keep; negative disables
/// eviction entirely (the list only grows, which is acceptable for
/// bounded-lifetime processes). The loop exits when the writer side of the
/// channel is gone.
pub(crate) fn spawn(rx: Receiver<PathBuf>, max_remain: i32) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("logroll-retention".into())
        .spawn(move || run(rx, max_remain))
}

fn run(rx: Receiver<PathBuf>, max_remain: i32) {
    let mut rotated: Vec<PathBuf> = match max_remain {
        n if n > 0 => Vec::with_capacity(n as usize + 1),
        _ => Vec::new(),
    };

    while let Ok(path) = rx.recv() {
        rotated.push(path);

        // oldest-first eviction; a failed delete is dropped from the list
        // anyway so the list stays bounded
        while max_remain >= 0 && rotated.len() > max_remain as usize {
            let oldest = rotated.remove(0);
            if let Err(e) = fs::remove_file(&oldest) {
                tracing::error!(
                    path = %oldest.display(),
                    error = %e,
                    "failed to delete expired log file"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "retention_test.rs"]
mod retention_test;
