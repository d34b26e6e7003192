//! Durable id→term store with disjoint write and read lifecycles.
//!
//! A handle is opened in exactly one mode for its whole lifetime. Write mode
//! is append-only ingestion used by the build pipeline; read mode is random
//! lookup used by application queries. The on-disk form is a single file:
//! a small header followed by length-prefixed, checksummed bincode records,
//! one per `add_entry` call. Repeated ids are not deduplicated on disk; read
//! open replays records in order, so the last write wins in the visible map.

use std::collections::HashMap;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use bincode::config::{self, Config};
use bincode::serde::{decode_from_slice, encode_to_vec};

use crate::constants::{RECORD_HEADER_SIZE, STORE_HEADER_SIZE, STORE_MAGIC, STORE_VERSION};
use crate::error::{DictError, Result};
use crate::types::Term;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Read,
    Write,
}

fn record_config() -> impl Config {
    config::standard()
        .with_fixed_int_encoding()
        .with_little_endian()
}

/// Handle to one persisted dictionary store file.
pub struct TermStore {
    path: PathBuf,
    mode: StoreMode,
    writer: Option<BufWriter<fs_err::File>>,
    appended: u64,
    terms: HashMap<String, Term>,
}

impl TermStore {
    /// Opens `location` in the given mode. Write mode creates or truncates the
    /// file and writes the header; read mode validates the header and replays
    /// every record into memory, failing on any structural damage.
    pub fn open<P: AsRef<Path>>(location: P, mode: StoreMode) -> Result<Self> {
        let path = location.as_ref().to_path_buf();
        match mode {
            StoreMode::Write => {
                let file = fs_err::File::create(&path)?;
                let mut writer = BufWriter::new(file);
                writer.write_all(&STORE_MAGIC)?;
                writer.write_all(&STORE_VERSION.to_le_bytes())?;
                Ok(Self {
                    path,
                    mode,
                    writer: Some(writer),
                    appended: 0,
                    terms: HashMap::new(),
                })
            }
            StoreMode::Read => {
                let mut file = fs_err::File::open(&path)?;
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)?;
                let terms = replay_records(&path, &bytes)?;
                Ok(Self {
                    path,
                    mode,
                    writer: None,
                    appended: 0,
                    terms,
                })
            }
        }
    }

    #[must_use]
    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of visible entries (read mode) or appended records (write mode).
    #[must_use]
    pub fn len(&self) -> u64 {
        match self.mode {
            StoreMode::Write => self.appended,
            StoreMode::Read => self.terms.len() as u64,
        }
    }

    /// Appends one entry. Repeating an id is allowed; the later record shadows
    /// the earlier one when the store is next opened for reading.
    pub fn add_entry(&mut self, id: &str, text: &str) -> Result<()> {
        let writer = match (self.mode, self.writer.as_mut()) {
            (StoreMode::Write, Some(writer)) => writer,
            _ => {
                return Err(DictError::WrongMode {
                    operation: "add_entry",
                    mode: self.mode,
                });
            }
        };

        let term = Term::new(id, text);
        let payload = encode_to_vec(&term, record_config())?;
        let digest = blake3::hash(&payload);

        let mut frame = Vec::with_capacity(RECORD_HEADER_SIZE + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(digest.as_bytes());
        frame.extend_from_slice(&payload);
        writer.write_all(&frame)?;

        self.appended += 1;
        Ok(())
    }

    /// Looks up one id.
    pub fn get_term(&self, id: &str) -> Result<Option<&Term>> {
        if self.mode != StoreMode::Read {
            return Err(DictError::WrongMode {
                operation: "get_term",
                mode: self.mode,
            });
        }
        Ok(self.terms.get(id))
    }

    /// Looks up many ids, returning one slot per input id in input order.
    /// Misses are explicit `None`s so callers can report them per key.
    pub fn get_terms<I, S>(&self, ids: I) -> Result<Vec<Option<Term>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.mode != StoreMode::Read {
            return Err(DictError::WrongMode {
                operation: "get_terms",
                mode: self.mode,
            });
        }
        Ok(ids
            .into_iter()
            .map(|id| self.terms.get(id.as_ref()).cloned())
            .collect())
    }

    /// Flushes and releases the underlying file. Safe to call repeatedly and
    /// after a failed open; subsequent calls are no-ops.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        Ok(())
    }
}

impl Drop for TermStore {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(store.path = %self.path.display(), error = %err, "store close on drop failed");
        }
    }
}

fn replay_records(path: &Path, bytes: &[u8]) -> Result<HashMap<String, Term>> {
    let header_len = STORE_HEADER_SIZE as usize;
    if bytes.len() < header_len || bytes[..STORE_MAGIC.len()] != STORE_MAGIC {
        return Err(DictError::Corrupt {
            path: path.to_path_buf(),
            offset: 0,
            reason: "missing or invalid store magic".into(),
        });
    }
    let version = u16::from_le_bytes([bytes[8], bytes[9]]);
    if version != STORE_VERSION {
        return Err(DictError::Corrupt {
            path: path.to_path_buf(),
            offset: 8,
            reason: format!("unsupported store version {version:#06x}"),
        });
    }

    let mut terms = HashMap::new();
    let mut cursor = header_len;
    while cursor < bytes.len() {
        let corrupt = |reason: &str| DictError::Corrupt {
            path: path.to_path_buf(),
            offset: cursor as u64,
            reason: reason.into(),
        };

        if cursor + RECORD_HEADER_SIZE > bytes.len() {
            return Err(corrupt("truncated record header"));
        }
        let length = u32::from_le_bytes(
            bytes[cursor..cursor + 4]
                .try_into()
                .map_err(|_| corrupt("invalid record length"))?,
        ) as usize;
        let checksum = &bytes[cursor + 4..cursor + RECORD_HEADER_SIZE];
        let payload_start = cursor + RECORD_HEADER_SIZE;
        let payload = bytes
            .get(payload_start..payload_start + length)
            .ok_or_else(|| corrupt("record length exceeds file size"))?;

        if blake3::hash(payload).as_bytes() != checksum {
            return Err(corrupt("record checksum mismatch"));
        }
        let (term, _): (Term, usize) = decode_from_slice(payload, record_config())?;
        terms.insert(term.id.clone(), term);

        cursor = payload_start + length;
    }
    Ok(terms)
}
