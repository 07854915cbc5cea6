//! Tests for the async write mode

use std::fs;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use crate::config::{Config, WriteMode};
use crate::error::Error;
use crate::util::POOLED_BUFFER_SIZE;
use crate::writer::{RollingWriter, from_config};

fn async_config(dir: &TempDir) -> Config {
    Config::default()
        .with_log_path(dir.path())
        .with_file_name("app")
        .with_write_mode(WriteMode::Async)
        .with_queue_size(64)
}

fn wait_for(mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("condition not met within 2s");
}

// ============================================================================
// Queue and drain
// ============================================================================

#[test]
fn test_close_drains_every_queued_chunk() {
    let dir = TempDir::new().unwrap();
    let writer = from_config(async_config(&dir)).unwrap();

    for chunk in ["alpha ", "beta ", "gamma"] {
        assert_eq!(writer.write(chunk.as_bytes()).unwrap(), chunk.len());
    }
    writer.close().unwrap();

    let content = fs::read(writer.path()).unwrap();
    assert_eq!(content, b"alpha beta gamma");
}

#[test]
fn test_caller_order_is_preserved() {
    let dir = TempDir::new().unwrap();
    let writer = from_config(async_config(&dir)).unwrap();

    for i in 0..50u8 {
        writer.write(&[i]).unwrap();
    }
    writer.close().unwrap();

    let content = fs::read(writer.path()).unwrap();
    let expected: Vec<u8> = (0..50).collect();
    assert_eq!(content, expected);
}

// ============================================================================
// Close semantics
// ============================================================================

#[test]
fn test_write_after_close_is_rejected() {
    let dir = TempDir::new().unwrap();
    let writer = from_config(async_config(&dir)).unwrap();

    writer.write(b"data").unwrap();
    writer.close().unwrap();

    assert!(matches!(writer.write(b"late"), Err(Error::Closed)));
}

#[test]
fn test_close_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let writer = from_config(async_config(&dir)).unwrap();

    writer.close().unwrap();
    assert!(matches!(writer.close(), Err(Error::Closed)));
}

// ============================================================================
// Error channel
// ============================================================================

#[test]
fn test_error_channel_is_available() {
    let dir = TempDir::new().unwrap();
    let writer = from_config(async_config(&dir)).unwrap();

    let errors = writer.error_channel().unwrap();
    assert!(errors.try_recv().is_err(), "no failures yet");
}

// ============================================================================
// Rotation
// ============================================================================

#[test]
fn test_rotation_splits_oversized_write_into_chunks() {
    let dir = TempDir::new().unwrap();
    let writer = from_config(async_config(&dir)).unwrap();
    let trigger = writer.rotation_trigger();

    writer.write(b"first").unwrap();
    wait_for(|| fs::read(writer.path()).unwrap() == b"first");

    let dest = dir.path().join("app.1.log");
    trigger.fire(&dest);

    let big = vec![7u8; POOLED_BUFFER_SIZE + 1024];
    assert_eq!(writer.write(&big).unwrap(), big.len());
    writer.close().unwrap();

    assert_eq!(fs::read(&dest).unwrap(), b"first");
    assert_eq!(fs::read(writer.path()).unwrap(), big);
}
