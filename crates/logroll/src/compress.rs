//! Gzip compression of rotated files
//!
//! Runs on the rotation-completion thread, never on the write path. The
//! rotated file has already been renamed to `<dest>.tmp`; its content is
//! read back through the still-open pre-rotation handle and gzip-encoded
//! into a fresh file at `dest`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

/// Path of the transient rename target: `<dest>.tmp`
pub(crate) fn tmp_path(dest: &Path) -> PathBuf {
    let mut os = dest.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Gzip-encode the full content behind `src` into a new file at `dest`,
/// then remove the `.tmp` file left by the rotation rename.
///
/// On encode failure the partial output at `dest` is removed (best effort)
/// and the raw content survives at `<dest>.tmp`.
pub(crate) fn compress_file(src: &File, dest: &Path) -> io::Result<()> {
    let out = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)?;
    let mut encoder = GzEncoder::new(out, Compression::default());

    let mut reader: &File = src;
    reader.seek(SeekFrom::Start(0))?;
    if let Err(e) = io::copy(&mut reader, &mut encoder) {
        drop(encoder);
        let _ = fs::remove_file(dest);
        return Err(e);
    }
    if let Err(e) = encoder.finish() {
        let _ = fs::remove_file(dest);
        return Err(e);
    }

    fs::remove_file(tmp_path(dest))
}

#[cfg(test)]
#[path = "compress_test.rs"]
mod compress_test;
