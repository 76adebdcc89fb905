//! Read-only view over a protocol directory and its manifest.
//!
//! # Layout
//!
//! ```text
//! <project>/.agent/
//!   manifest.json      (optional; JSON, see [`Manifest`])
//!   start-here.md      (entry file, locked)
//!   core/ meta/ ...    (locked directories)
//!   project/           (project-owned, never synced)
//! ```
//!
//! The manifest is loaded once when the tree is opened. A tree is never
//! cached between operations: callers open a fresh one per invocation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, TreeError};
use crate::types::{LoadingStrategy, Manifest, Scope};

/// File name of the manifest, relative to the tree root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Directory name of the protocol tree inside a project.
pub const AGENT_DIR: &str = ".agent";

/// `<project_root>/.agent` — pure, no I/O.
pub fn agent_dir(project_root: &Path) -> PathBuf {
    project_root.join(AGENT_DIR)
}

/// An immutable protocol root plus its (optional) manifest.
#[derive(Debug, Clone)]
pub struct ProtocolTree {
    root: PathBuf,
    manifest: Option<Manifest>,
    scope: Scope,
}

impl ProtocolTree {
    /// Open the tree rooted at `root`.
    ///
    /// Fails only when `root` is not a directory. A missing or malformed
    /// manifest degrades to `None`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, TreeError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(TreeError::ProtocolNotFound { path: root });
        }
        let manifest = load_manifest(&root);
        Ok(Self {
            root,
            manifest,
            scope: Scope::default(),
        })
    }

    /// Replace the default locked/project partition.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Manifest `version`, if present and a string.
    pub fn version(&self) -> Option<&str> {
        self.manifest.as_ref().and_then(|m| m.version.as_deref())
    }

    pub fn loading_strategy(&self) -> Option<&LoadingStrategy> {
        self.manifest
            .as_ref()
            .and_then(|m| m.loading_strategy.as_ref())
    }

    /// Absolute path of a `/`-separated relative path.
    pub fn path_of(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }

    /// Read a relative path as UTF-8 text.
    pub fn read_text(&self, rel: &str) -> Result<String, TreeError> {
        let path = self.path_of(rel);
        std::fs::read_to_string(&path).map_err(|e| io_err(path, e))
    }
}

/// Load `<root>/manifest.json`, failing if it is absent or malformed.
///
/// Used by operations that cannot proceed without a manifest
/// (e.g. rewriting checksums).
pub fn load_manifest_strict(root: &Path) -> Result<Manifest, TreeError> {
    let path = root.join(MANIFEST_FILE);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(TreeError::ManifestNotFound { path });
        }
        Err(err) => return Err(io_err(path, err)),
    };
    serde_json::from_str(&contents).map_err(|source| TreeError::Parse { path, source })
}

/// Load `<root>/manifest.json`, returning `None` when absent or malformed.
pub fn load_manifest(root: &Path) -> Option<Manifest> {
    match load_manifest_strict(root) {
        Ok(manifest) => Some(manifest),
        Err(TreeError::ManifestNotFound { path }) => {
            tracing::debug!("no manifest at {}", path.display());
            None
        }
        Err(err) => {
            tracing::warn!("ignoring unreadable manifest: {err}");
            None
        }
    }
}

/// `/`-separated path of `path` relative to `root`.
///
/// `None` if `path` is outside `root` or any component is not valid UTF-8.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<&str>>>()?;
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}
