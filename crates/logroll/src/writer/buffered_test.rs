//! Tests for the buffer write mode

use std::fs;

use tempfile::TempDir;

use crate::config::{Config, WriteMode};
use crate::writer::{RollingWriter, from_config};

fn buffered_config(dir: &TempDir, threshold: usize) -> Config {
    Config::default()
        .with_log_path(dir.path())
        .with_file_name("app")
        .with_write_mode(WriteMode::Buffer)
        .with_buffer_threshold(threshold)
}

// ============================================================================
// Coalescing
// ============================================================================

#[test]
fn test_small_writes_stay_pending_until_close() {
    let dir = TempDir::new().unwrap();
    let writer = from_config(buffered_config(&dir, 1024)).unwrap();

    writer.write(b"one ").unwrap();
    writer.write(b"two ").unwrap();
    assert_eq!(
        fs::read(writer.path()).unwrap(),
        b"",
        "below the threshold nothing reaches the file"
    );

    writer.close().unwrap();
    assert_eq!(fs::read(writer.path()).unwrap(), b"one two ");
}

#[test]
fn test_crossing_threshold_flushes() {
    let dir = TempDir::new().unwrap();
    let writer = from_config(buffered_config(&dir, 8)).unwrap();

    writer.write(b"0123456789").unwrap();
    assert_eq!(fs::read(writer.path()).unwrap(), b"0123456789");
}

#[test]
fn test_close_writes_concatenation_in_order() {
    let dir = TempDir::new().unwrap();
    let writer = from_config(buffered_config(&dir, 4)).unwrap();

    writer.write(b"abcdef").unwrap(); // crosses, flushes
    writer.write(b"gh").unwrap(); // stays pending
    writer.close().unwrap();

    assert_eq!(fs::read(writer.path()).unwrap(), b"abcdefgh");
}

#[test]
fn test_io_write_flush_drains_pending() {
    use std::io::Write;

    let dir = TempDir::new().unwrap();
    let mut writer = from_config(buffered_config(&dir, 1024)).unwrap();

    writer.write_all(b"pending bytes").unwrap();
    assert_eq!(fs::read(writer.path()).unwrap(), b"");

    writer.flush().unwrap();
    assert_eq!(fs::read(writer.path()).unwrap(), b"pending bytes");
}

// ============================================================================
// Rotation
// ============================================================================

#[test]
fn test_rotation_between_flushes() {
    let dir = TempDir::new().unwrap();
    let writer = from_config(buffered_config(&dir, 0)).unwrap();
    let trigger = writer.rotation_trigger();

    // threshold 0: every non-empty write flushes immediately
    writer.write(b"aa").unwrap();

    let dest = dir.path().join("app.1.log");
    trigger.fire(&dest);
    writer.write(b"bb").unwrap();
    writer.close().unwrap();

    assert_eq!(fs::read(&dest).unwrap(), b"aa");
    assert_eq!(fs::read(writer.path()).unwrap(), b"bb");
}
