//! # cokodo-sync
//!
//! Checksums, local-vs-reference diffing and sync, protocol sources and the
//! protocol linter.
//!
//! Call [`pipeline::open_pair`] to pair a project's `.agent` directory with a
//! reference tree, then [`diff`] or [`sync`] the pair.

pub mod bundled;
pub mod checksum;
pub mod diff;
pub mod error;
pub mod lint;
mod manifest_store;
pub mod pipeline;
pub mod source;
pub mod writer;

pub use checksum::{generate, hash_bytes, hash_file, protocol_files, update_checksums, verify};
pub use diff::{diff, render_patch, DiffEntry, DiffReport, DiffStatus};
pub use error::{SourceError, SyncError};
pub use lint::{LintFinding, LintRule, Linter};
pub use source::{
    default_sources, resolve_protocol, BundledSource, DirectorySource, ProtocolSource,
    ResolvedProtocol,
};
pub use writer::{sync, SyncOptions, SyncResult};
