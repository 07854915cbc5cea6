//! Tests for rotated-file compression

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tempfile::TempDir;

use crate::compress::{compress_file, tmp_path};

fn gunzip(path: &Path) -> Vec<u8> {
    let mut decoder = GzDecoder::new(File::open(path).unwrap());
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();
    out
}

#[test]
fn test_tmp_path_appends_suffix() {
    assert_eq!(
        tmp_path(Path::new("/logs/app.1.log.gz")).to_str().unwrap(),
        "/logs/app.1.log.gz.tmp"
    );
}

#[test]
fn test_compress_round_trip() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("app.1.log.gz");
    let tmp = tmp_path(&dest);

    // the rotation path renames the rotated file to <dest>.tmp before
    // encoding; stage the same layout here
    let content = b"hello-log\nanother line\n";
    fs::write(&tmp, content).unwrap();
    let src = File::open(&tmp).unwrap();

    compress_file(&src, &dest).unwrap();

    assert!(dest.exists(), "compressed artifact should exist");
    assert!(!tmp.exists(), "tmp file should be removed");
    assert_eq!(gunzip(&dest), content);
}

#[test]
fn test_compress_empty_file() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("empty.log.gz");
    let tmp = tmp_path(&dest);

    fs::write(&tmp, b"").unwrap();
    let src = File::open(&tmp).unwrap();

    compress_file(&src, &dest).unwrap();
    assert_eq!(gunzip(&dest), b"");
}

#[test]
fn test_compress_reads_from_offset_zero() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("seek.log.gz");
    let tmp = tmp_path(&dest);

    fs::write(&tmp, b"0123456789").unwrap();
    let mut src = File::open(&tmp).unwrap();

    // a handle that has already been read from still compresses fully
    let mut skipped = [0u8; 4];
    src.read_exact(&mut skipped).unwrap();

    compress_file(&src, &dest).unwrap();
    assert_eq!(gunzip(&dest), b"0123456789");
}

#[test]
fn test_missing_tmp_is_an_error() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("app.log.gz");

    // source handle exists but the staged .tmp file does not
    let src_path = dir.path().join("source.log");
    fs::write(&src_path, b"data").unwrap();
    let src = File::open(&src_path).unwrap();

    assert!(compress_file(&src, &dest).is_err());
}
