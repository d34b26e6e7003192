#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(test, allow(clippy::uninlined_format_args))]
#![allow(clippy::module_name_repetitions)]
//
// Strategic lint exceptions, allowed crate-wide:
//
// Documentation lints: internal/self-documenting functions don't need
// exhaustive docs; public APIs should still carry proper documentation.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Cast safety: the few casts here are bounded by real-world constraints
// (record lengths, line lengths, entry counts).
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
//
// Many builders take owned values intentionally.
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Dictionary build-and-query engine for flat-file bioinformatics
//! vocabularies.
//!
//! The crate turns irregularly formatted release files (domain names,
//! protein-family names, enzyme names, keyed by an external identifier) into
//! durable id→term lookup stores via a crash-safe build pipeline:
//!
//! - [`TermParser`] implementations tolerate mixed line dialects and partial
//!   corruption, resolved through a [`ParserRegistry`];
//! - [`TermStore`] persists entries with disjoint write (ingestion) and read
//!   (lookup) lifecycles;
//! - [`IndexBuildTask`] drives a parser into a temporary building location
//!   and publishes it with an atomic rename, with idempotent reruns and
//!   stale-artifact recovery;
//! - [`MirrorChangeBus`] lets the surrounding mirror manager observe
//!   dictionary-set changes.

/// The biodict-core crate version (matches `Cargo.toml`).
pub const BIODICT_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod build;
pub mod bus;
pub mod constants;
pub mod error;
pub mod fsio;
pub mod monitor;
pub mod parser;
pub mod store;
pub mod types;

pub use build::IndexBuildTask;
pub use bus::{MirrorChangeBus, Subscription};
pub use constants::{BUILDING_SUFFIX, READY_SUFFIX, VERBOSE_REPORT_INTERVAL};
pub use error::{DictError, Result};
pub use monitor::ProgressMonitor;
pub use parser::{ColumnarTermParser, DelimitedTermParser, ParserRegistry, TermParser};
pub use store::{StoreMode, TermStore};
pub use types::{
    DictionaryLayout, IndexState, MirrorChangeEvent, MirrorChangeKind, MirrorDescriptor,
    ParseResult, Term,
};
