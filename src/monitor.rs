//! Progress observation hooks for parse runs.

use std::path::Path;

/// Observer notified while a parser streams a source file.
///
/// Every method has a no-op default so implementors override only what they
/// need; a parse run with no monitor behaves identically to one with a monitor
/// that overrides nothing. `entry_found` fires *before* the entry is durably
/// recorded, so a monitor can also be used standalone to cross-validate a
/// source file against an already-built store without writing anything.
pub trait ProgressMonitor {
    /// Called once before the first line of `path` is read.
    fn start_processing_file(&self, path: &Path, size_bytes: u64) {
        let _ = (path, size_bytes);
    }

    /// Called for every accepted entry with its byte span within the file.
    /// `redundancy_check_requested` echoes [`treat_redundant_id_as_error`]
    /// so per-entry consumers need not re-query it.
    ///
    /// [`treat_redundant_id_as_error`]: Self::treat_redundant_id_as_error
    fn entry_found(
        &self,
        id: &str,
        term: &str,
        path: &Path,
        start_offset: u64,
        end_offset: u64,
        redundancy_check_requested: bool,
    ) {
        let _ = (id, term, path, start_offset, end_offset, redundancy_check_requested);
    }

    /// Called once after the last line, success or not, with the count of
    /// entries accepted so far.
    fn stop_processing_file(&self, path: &Path, total_accepted: u64) {
        let _ = (path, total_accepted);
    }

    /// Whether a repeated id should be surfaced as an error by consumers that
    /// layer duplicate detection on top of the store's last-write-wins default.
    fn treat_redundant_id_as_error(&self) -> bool {
        false
    }
}
