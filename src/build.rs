//! Build orchestrator: resolves a parser, streams a source file into a store
//! at the building location, and atomically publishes the result.
//!
//! State machine:
//! `Idle -> CheckExisting -> {done | Cleanup -> Building} -> Parsing ->
//! {Publish -> Ready | Discard -> Failed}`.
//!
//! A failed run leaves its building artifact on disk for diagnosis; the next
//! run's cleanup step is the sole recovery mechanism. The rename at publish is
//! the durability boundary and assumes both locations share a volume.

use std::path::{Path, PathBuf};

use crate::error::{DictError, Result};
use crate::fsio;
use crate::monitor::ProgressMonitor;
use crate::parser::ParserRegistry;
use crate::store::{StoreMode, TermStore};
use crate::types::DictionaryLayout;

/// One dictionary build. Constructed per invocation; an external scheduler
/// decides when (and whether) to retry a failed build.
pub struct IndexBuildTask<'a> {
    registry: &'a ParserRegistry,
    layout: DictionaryLayout,
    source: PathBuf,
    kind: String,
    file_override: Option<PathBuf>,
    verbose: bool,
    monitor: Option<&'a dyn ProgressMonitor>,
    error_message: Option<String>,
}

impl<'a> IndexBuildTask<'a> {
    /// `source` is the mirror's source reference: the default data file, and
    /// the anchor for resolving a relative `file` override.
    #[must_use]
    pub fn new(
        registry: &'a ParserRegistry,
        layout: DictionaryLayout,
        source: impl Into<PathBuf>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            layout,
            source: source.into(),
            kind: kind.into(),
            file_override: None,
            verbose: false,
            monitor: None,
            error_message: None,
        }
    }

    /// Overrides the data file. A relative path is resolved against the
    /// source reference's parent directory.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file_override = Some(file.into());
        self
    }

    #[must_use]
    pub fn with_monitor(mut self, monitor: &'a dyn ProgressMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Runs the build to completion. Returns `true` on success, including the
    /// short-circuit when the dictionary is already published; `false` leaves
    /// the failure reason in [`error_message`](Self::error_message).
    pub fn execute(&mut self) -> bool {
        self.error_message = None;
        match self.run() {
            Ok(()) => true,
            Err(err) => {
                let message = format!(
                    "building dictionary '{}' failed: {err}",
                    self.layout.name()
                );
                tracing::warn!(
                    build.dictionary = self.layout.name(),
                    build.kind = %self.kind,
                    error = %err,
                    "dictionary build failed"
                );
                self.error_message = Some(message);
                false
            }
        }
    }

    /// Failure reason captured by the last [`execute`](Self::execute) call.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn run(&mut self) -> Result<()> {
        let ready = self.layout.ready_path();
        let building = self.layout.building_path();

        // CheckExisting: an already-published index makes a rerun a no-op.
        if ready.exists() {
            tracing::info!(
                build.dictionary = self.layout.name(),
                build.ready = %ready.display(),
                "dictionary already mirrored, skipping build"
            );
            return Ok(());
        }

        // Cleanup: a surviving building artifact means a previous run crashed
        // or failed; it must go before a fresh store is opened there.
        if building.exists() {
            tracing::info!(
                build.dictionary = self.layout.name(),
                build.stale = %building.display(),
                "removing stale build artifact"
            );
            fsio::remove_artifact(&building)?;
        }

        // Building: resolve the format parser for the configured type.
        let mut parser =
            self.registry
                .resolve(&self.kind)
                .ok_or_else(|| DictError::Configuration {
                    kind: self.kind.clone(),
                })?;
        parser.set_verbose(self.verbose);

        // Parsing: stream the source into a write-mode store. The store is
        // closed on both outcomes before the state is left.
        let data = self.data_path();
        tracing::info!(
            build.dictionary = self.layout.name(),
            build.parser = parser.kind(),
            build.source = %data.display(),
            "parsing dictionary source"
        );
        let mut store = TermStore::open(&building, StoreMode::Write)?;
        let parsed = parser.parse(&data, Some(&mut store), self.monitor);
        let closed = store.close();
        let parsed = parsed?;
        closed?;

        // Publish: same-volume atomic rename is the durability boundary.
        // Failure here is fatal and is not rolled back or retried.
        fs_err::rename(&building, &ready)?;
        tracing::info!(
            build.dictionary = self.layout.name(),
            build.accepted = parsed.accepted,
            build.ready = %ready.display(),
            "dictionary published"
        );
        Ok(())
    }

    fn data_path(&self) -> PathBuf {
        match &self.file_override {
            None => self.source.clone(),
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => self
                .source
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
                .join(file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir) -> (DictionaryLayout, PathBuf) {
        let source = dir.path().join("names.flat");
        std::fs::write(&source, b"PDOC00001;Insulin family signature\n").unwrap();
        (DictionaryLayout::new("prosite", dir.path()), source)
    }

    #[test]
    fn unknown_type_is_a_configuration_failure() {
        let dir = TempDir::new().unwrap();
        let (layout, source) = fixture(&dir);
        let registry = ParserRegistry::default();

        let mut task = IndexBuildTask::new(&registry, layout.clone(), &source, "mystery");
        assert!(!task.execute());
        let message = task.error_message().unwrap();
        assert!(message.contains("mystery"), "got: {message}");
        // no parser resolved, so nothing was written anywhere
        assert!(!layout.building_path().exists());
        assert!(!layout.ready_path().exists());
    }

    #[test]
    fn relative_file_override_resolves_against_source_parent() {
        let dir = TempDir::new().unwrap();
        let (layout, source) = fixture(&dir);
        std::fs::write(dir.path().join("other.flat"), b"X;alternate entry\n").unwrap();
        let registry = ParserRegistry::default();

        let mut task = IndexBuildTask::new(&registry, layout.clone(), &source, "delimited")
            .with_file("other.flat");
        assert!(task.execute(), "{:?}", task.error_message());

        let store = TermStore::open(layout.ready_path(), StoreMode::Read).unwrap();
        assert!(store.get_term("X").unwrap().is_some());
        assert!(store.get_term("PDOC00001").unwrap().is_none());
    }

    #[test]
    fn failed_parse_leaves_building_artifact_and_no_ready() {
        let dir = TempDir::new().unwrap();
        let (layout, source) = fixture(&dir);
        std::fs::write(&source, b"nothing parseable here\n").unwrap();
        let registry = ParserRegistry::default();

        let mut task = IndexBuildTask::new(&registry, layout.clone(), &source, "delimited");
        assert!(!task.execute());
        assert!(task.error_message().unwrap().contains("no terms found"));
        assert!(layout.building_path().exists());
        assert!(!layout.ready_path().exists());
    }
}
