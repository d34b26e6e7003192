//! Public value types shared across the parser, store, and build layers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{BUILDING_SUFFIX, READY_SUFFIX};

/// One dictionary entry: an external cross-reference id mapped to its
/// human-readable name. The text may contain arbitrary characters, including
/// the field delimiter of whichever source format produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    pub text: String,
}

impl Term {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Outcome of a successful parse. A parse that accepted zero entries never
/// produces one of these; it fails with [`DictError::NoTermsFound`] instead.
///
/// [`DictError::NoTermsFound`]: crate::DictError::NoTermsFound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub accepted: u64,
    pub source: PathBuf,
}

/// At-rest state of a dictionary index as observed on the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// The published location exists and is queryable.
    Ready,
    /// Only an in-progress (or crashed) build artifact exists.
    Building,
    /// Neither location exists.
    Absent,
}

/// Maps a logical dictionary name to its pair of sibling on-disk locations.
///
/// The ready and building paths share a base name and differ only in suffix,
/// so the publish step can promote the artifact with a same-volume rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryLayout {
    name: String,
    root: PathBuf,
}

impl DictionaryLayout {
    #[must_use]
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Published, queryable location.
    #[must_use]
    pub fn ready_path(&self) -> PathBuf {
        self.root.join(format!("{}{READY_SUFFIX}", self.name))
    }

    /// Temporary location a build writes into before publish.
    #[must_use]
    pub fn building_path(&self) -> PathBuf {
        self.root.join(format!("{}{BUILDING_SUFFIX}", self.name))
    }

    /// Probes the filesystem for the current state. Ready wins when both
    /// locations transiently coexist, since a ready artifact is always
    /// complete and valid.
    #[must_use]
    pub fn state(&self) -> IndexState {
        if self.ready_path().exists() {
            IndexState::Ready
        } else if self.building_path().exists() {
            IndexState::Building
        } else {
            IndexState::Absent
        }
    }
}

/// Identifies a mirrored database in change notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorDescriptor {
    pub name: String,
    pub root: PathBuf,
}

impl MirrorDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorChangeKind {
    Added,
    Removed,
    Changed,
}

/// Fire-and-forget notification that the set of mirrored dictionaries changed.
/// Not persisted; subscribers absent at publish time never see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorChangeEvent {
    pub kind: MirrorChangeKind,
    pub descriptor: MirrorDescriptor,
}

impl MirrorChangeEvent {
    #[must_use]
    pub fn new(kind: MirrorChangeKind, descriptor: MirrorDescriptor) -> Self {
        Self { kind, descriptor }
    }
}
