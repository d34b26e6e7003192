//! Term parser trait and registry for heterogeneous flat-file vocabularies.
//!
//! Each source format contributes a small parser implementing per-line id/term
//! extraction; the streaming driver here owns everything else (file I/O,
//! offset accounting, monitor callbacks, store writes, tolerance policy), so
//! adding a new dictionary format is a purely additive change.

mod columnar;
mod delimited;

use std::io::{BufRead, BufReader};
use std::path::Path;

pub use columnar::ColumnarTermParser;
pub use delimited::DelimitedTermParser;

use crate::constants::VERBOSE_REPORT_INTERVAL;
use crate::error::{DictError, Result};
use crate::fsio;
use crate::monitor::ProgressMonitor;
use crate::store::TermStore;
use crate::types::ParseResult;

/// A format-specific streaming parser turning a flat file into (id, term)
/// pairs. Implementors supply only [`extract`](Self::extract); the provided
/// [`parse`](Self::parse) drives the file.
pub trait TermParser {
    /// Registry key and diagnostics name for this format.
    fn kind(&self) -> &'static str;

    /// Extracts `(id, term)` from one line, already stripped of its
    /// terminator. `None` skips the line per the tolerance policy.
    fn extract(&self, line: &str) -> Option<(String, String)>;

    fn set_verbose(&mut self, verbose: bool);

    fn verbose(&self) -> bool;

    /// Streams `source` through [`extract`](Self::extract), feeding accepted
    /// entries to `store` and `monitor`.
    ///
    /// Lines that yield no entry are skipped silently; a file that yields
    /// zero entries overall fails with [`DictError::NoTermsFound`]. Monitor
    /// callbacks fire before the corresponding store write. The file handle
    /// is released on every exit path.
    fn parse(
        &self,
        source: &Path,
        mut store: Option<&mut TermStore>,
        monitor: Option<&dyn ProgressMonitor>,
    ) -> Result<ParseResult> {
        let open_failed = |err: std::io::Error| DictError::Source {
            path: source.to_path_buf(),
            reason: err.to_string(),
        };
        let size_bytes = fs_err::metadata(source).map_err(open_failed)?.len();
        let terminator_width = fsio::line_terminator_width(source)?;
        let file = fs_err::File::open(source).map_err(open_failed)?;
        let mut reader = BufReader::new(file);

        if let Some(monitor) = monitor {
            monitor.start_processing_file(source, size_bytes);
        }
        let redundancy_check = match monitor {
            Some(monitor) => monitor.treat_redundant_id_as_error(),
            None => false,
        };

        let mut accepted = 0u64;
        let mut offset = 0u64;
        let mut line = String::new();
        let outcome = loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break Ok(()),
                Ok(_) => {}
                Err(err) => {
                    break Err(DictError::Source {
                        path: source.to_path_buf(),
                        reason: err.to_string(),
                    });
                }
            }
            let content = line.trim_end_matches(['\r', '\n']);
            let start_offset = offset;
            // A final line without a terminator consumes only its own bytes.
            let consumed = if line.ends_with('\n') {
                content.len() as u64 + terminator_width
            } else {
                content.len() as u64
            };
            let end_offset = start_offset + consumed;
            offset = end_offset;

            let Some((id, term)) = self.extract(content) else {
                continue;
            };
            accepted += 1;

            if let Some(monitor) = monitor {
                monitor.entry_found(
                    &id,
                    &term,
                    source,
                    start_offset,
                    end_offset,
                    redundancy_check,
                );
            }
            if self.verbose() && accepted % VERBOSE_REPORT_INTERVAL == 0 {
                tracing::info!(
                    parser.kind = self.kind(),
                    parser.accepted = accepted,
                    parser.latest_id = %id,
                    parser.latest_term = %term,
                    "parse progress"
                );
            }
            if let Some(store) = store.as_deref_mut() {
                if let Err(err) = store.add_entry(&id, &term) {
                    break Err(DictError::Build {
                        dictionary: self.kind().to_string(),
                        message: err.to_string(),
                        entry_ordinal: Some(accepted),
                    });
                }
            }
        };

        if let Some(monitor) = monitor {
            monitor.stop_processing_file(source, accepted);
        }
        outcome?;

        if accepted == 0 {
            return Err(DictError::NoTermsFound {
                path: source.to_path_buf(),
            });
        }
        Ok(ParseResult {
            accepted,
            source: source.to_path_buf(),
        })
    }
}

type ParserFactory = Box<dyn Fn() -> Box<dyn TermParser> + Send + Sync>;

/// Maps dictionary-type strings to parser constructors.
///
/// Built as a value at startup and passed by reference into build tasks;
/// there is deliberately no process-wide registry singleton.
pub struct ParserRegistry {
    factories: Vec<(String, ParserFactory)>,
}

impl ParserRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Registers a factory for `kind`, replacing any earlier registration of
    /// the same kind.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn TermParser> + Send + Sync + 'static,
    {
        let kind = kind.into();
        self.factories.retain(|(registered, _)| *registered != kind);
        self.factories.push((kind, Box::new(factory)));
    }

    /// Builds a fresh parser for `kind`, or `None` for an unknown type.
    #[must_use]
    pub fn resolve(&self, kind: &str) -> Option<Box<dyn TermParser>> {
        self.factories
            .iter()
            .find(|(registered, _)| registered == kind)
            .map(|(_, factory)| factory())
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        self.factories
            .iter()
            .map(|(kind, _)| kind.as_str())
            .collect()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("delimited", || Box::new(DelimitedTermParser::new()));
        registry.register("columnar", || Box::new(ColumnarTermParser::new()));
        // Domain-flavoured aliases used by mirror build configurations.
        registry.register("domain", || Box::new(DelimitedTermParser::new()));
        registry.register("family", || Box::new(ColumnarTermParser::new()));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingMonitor {
        events: Mutex<Vec<(String, String, u64, u64)>>,
        files: Mutex<Vec<(PathBuf, u64)>>,
        totals: Mutex<Vec<u64>>,
    }

    impl ProgressMonitor for RecordingMonitor {
        fn start_processing_file(&self, path: &Path, size_bytes: u64) {
            self.files
                .lock()
                .unwrap()
                .push((path.to_path_buf(), size_bytes));
        }

        fn entry_found(
            &self,
            id: &str,
            term: &str,
            _path: &Path,
            start_offset: u64,
            end_offset: u64,
            _redundancy_check_requested: bool,
        ) {
            self.events
                .lock()
                .unwrap()
                .push((id.to_string(), term.to_string(), start_offset, end_offset));
        }

        fn stop_processing_file(&self, _path: &Path, total_accepted: u64) {
            self.totals.lock().unwrap().push(total_accepted);
        }
    }

    fn write_source(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn registry_resolves_known_kinds_only() {
        let registry = ParserRegistry::default();
        assert_eq!(registry.resolve("delimited").unwrap().kind(), "delimited");
        assert_eq!(registry.resolve("family").unwrap().kind(), "columnar");
        assert!(registry.resolve("mystery").is_none());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut registry = ParserRegistry::default();
        registry.register("domain", || Box::new(ColumnarTermParser::new()));
        assert_eq!(registry.resolve("domain").unwrap().kind(), "columnar");
        let domains = registry
            .kinds()
            .iter()
            .filter(|kind| **kind == "domain")
            .count();
        assert_eq!(domains, 1);
    }

    #[test]
    fn monitor_sees_offsets_before_and_totals_after() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir, "d.txt", b"A;alpha\nbad line\nB;beta\n");
        let monitor = RecordingMonitor::default();

        let parser = DelimitedTermParser::new();
        let result = parser.parse(&source, None, Some(&monitor)).unwrap();
        assert_eq!(result.accepted, 2);

        let events = monitor.events.lock().unwrap();
        // "A;alpha\n" spans [0, 8); "bad line\n" is skipped but still consumes
        // bytes, so "B;beta\n" spans [17, 24).
        assert_eq!(events[0], ("A".into(), "alpha".into(), 0, 8));
        assert_eq!(events[1], ("B".into(), "beta".into(), 17, 24));

        let files = monitor.files.lock().unwrap();
        assert_eq!(files[0].1, 24);
        assert_eq!(*monitor.totals.lock().unwrap(), vec![2]);
    }

    #[test]
    fn crlf_offsets_use_two_byte_terminator() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir, "d.txt", b"A;alpha\r\nB;beta\r\n");
        let monitor = RecordingMonitor::default();

        DelimitedTermParser::new()
            .parse(&source, None, Some(&monitor))
            .unwrap();

        let events = monitor.events.lock().unwrap();
        assert_eq!(events[0].2..events[0].3, 0..9);
        assert_eq!(events[1].2..events[1].3, 9..17);
    }

    #[test]
    fn zero_accepted_lines_fail_after_stop_notification() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir, "d.txt", b"no delimiter here\nnor here\n");
        let monitor = RecordingMonitor::default();

        let err = DelimitedTermParser::new()
            .parse(&source, None, Some(&monitor))
            .unwrap_err();
        assert!(matches!(err, DictError::NoTermsFound { .. }));
        // stop still fired, with a zero total
        assert_eq!(*monitor.totals.lock().unwrap(), vec![0]);
    }

    #[test]
    fn unterminated_final_line_does_not_overshoot_eof() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir, "d.txt", b"A;alpha\nB;beta");
        let monitor = RecordingMonitor::default();

        DelimitedTermParser::new()
            .parse(&source, None, Some(&monitor))
            .unwrap();

        let events = monitor.events.lock().unwrap();
        assert_eq!(events[0].2..events[0].3, 0..8);
        // last line has no terminator; its span ends at the file size
        assert_eq!(events[1].2..events[1].3, 8..14);
        assert_eq!(monitor.files.lock().unwrap()[0].1, 14);
    }

    #[test]
    fn store_rejection_is_annotated_with_entry_ordinal() {
        use crate::store::{StoreMode, TermStore};

        let dir = TempDir::new().unwrap();
        let store_path = dir.path().join("read-only.dict");
        {
            let mut store = TermStore::open(&store_path, StoreMode::Write).unwrap();
            store.add_entry("SEED", "seed entry").unwrap();
            store.close().unwrap();
        }
        let mut reader = TermStore::open(&store_path, StoreMode::Read).unwrap();

        let source = write_source(&dir, "d.txt", b"A;alpha\nB;beta\n");
        let err = DelimitedTermParser::new()
            .parse(&source, Some(&mut reader), None)
            .unwrap_err();
        assert!(matches!(
            err,
            DictError::Build {
                entry_ordinal: Some(1),
                ..
            }
        ));
        let message = err.to_string();
        assert!(message.contains("at entry 1"), "got: {message}");
    }

    #[test]
    fn verbose_mode_is_observational_only() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir, "d.txt", b"A;alpha\nbad line\nB;beta\n");

        let quiet = DelimitedTermParser::new();
        let mut loud = DelimitedTermParser::new();
        loud.set_verbose(true);
        assert!(loud.verbose());

        let baseline = quiet.parse(&source, None, None).unwrap();
        let verbose = loud.parse(&source, None, None).unwrap();
        assert_eq!(baseline, verbose);
    }

    #[test]
    fn missing_source_is_a_source_error() {
        let dir = TempDir::new().unwrap();
        let err = DelimitedTermParser::new()
            .parse(&dir.path().join("absent.txt"), None, None)
            .unwrap_err();
        assert!(matches!(err, DictError::Source { .. }));
    }
}
