//! Filesystem helpers shared by the parsers and the build orchestrator.

use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Result;

/// Probes the line-terminator byte width of a text file: 2 for CRLF, 1 for LF.
///
/// The probe reads up to the first newline; a file with no newline at all is
/// treated as LF-terminated. The width is sampled once per file and assumed
/// uniform, which holds for the flat-file releases this crate mirrors.
pub fn line_terminator_width(path: &Path) -> Result<u64> {
    let file = fs_err::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut previous = 0u8;
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte)? {
            0 => return Ok(1),
            _ if byte[0] == b'\n' => {
                return Ok(if previous == b'\r' { 2 } else { 1 });
            }
            _ => previous = byte[0],
        }
    }
}

/// Removes a build artifact, whether a prior store format left a directory or
/// the current one left a single file. Missing paths are not an error.
pub fn remove_artifact(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    if path.is_dir() {
        fs_err::remove_dir_all(path)?;
    } else {
        fs_err::remove_file(path)?;
    }
    Ok(())
}
