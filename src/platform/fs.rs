// JobTimeline - platform/fs.rs
//
// File reading helpers used by the pipeline.

use std::io;
use std::path::Path;

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion so one stray byte in
/// a job log does not hide the rest of it. The file handle is closed before
/// returning, on success and on error.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
