//! Runtime settings resolved from the environment.
//!
//! | Variable                 | Effect                                        |
//! |--------------------------|-----------------------------------------------|
//! | `COKODO_CACHE_DIR`       | cache root (default `<home>/.cache/cokodo`)   |
//! | `COKODO_OFFLINE`         | `1`/`true`/`yes` skips remote sources         |
//! | `COKODO_PROTOCOL_SOURCE` | local protocol directory tried before bundled |
//!
//! Every accessor has two forms, `fn_at(home, …)` for tests and `fn()` that
//! derives the home directory from `dirs::home_dir()`.

use std::path::{Path, PathBuf};

use crate::error::TreeError;

pub const ENV_CACHE_DIR: &str = "COKODO_CACHE_DIR";
pub const ENV_OFFLINE: &str = "COKODO_OFFLINE";
pub const ENV_PROTOCOL_SOURCE: &str = "COKODO_PROTOCOL_SOURCE";

/// Protocol version shipped inside the binary.
pub const BUNDLED_PROTOCOL_VERSION: &str = "3.1.1";

/// Target format version per supported tool, as `(tool, version)`.
pub const TOOL_SPEC_VERSIONS: &[(&str, &str)] = &[
    ("cursor", "2026-02"),
    ("claude", "2026-02"),
    ("copilot", "2026-02"),
    ("gemini", "2026-02"),
];

/// Look up the target format version of `tool`, or `"unknown"`.
pub fn tool_spec_version(tool: &str) -> &'static str {
    TOOL_SPEC_VERSIONS
        .iter()
        .find(|(name, _)| *name == tool)
        .map(|(_, version)| *version)
        .unwrap_or("unknown")
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cache_dir: PathBuf,
    pub offline: bool,
    pub source_dir: Option<PathBuf>,
}

impl Settings {
    /// Build settings from the environment with an explicit home directory.
    pub fn from_env_at(home: &Path) -> Self {
        Self::from_lookup_at(home, |key| std::env::var(key).ok())
    }

    /// Build settings from the environment.
    pub fn from_env() -> Result<Self, TreeError> {
        let home = dirs::home_dir().ok_or(TreeError::HomeNotFound)?;
        Ok(Self::from_env_at(&home))
    }

    fn from_lookup_at(home: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let cache_dir = lookup(ENV_CACHE_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_cache_dir_at(home));
        let offline = lookup(ENV_OFFLINE)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let source_dir = lookup(ENV_PROTOCOL_SOURCE)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self {
            cache_dir,
            offline,
            source_dir,
        }
    }

    /// Directory the bundled protocol is unpacked into.
    pub fn bundled_dir(&self) -> PathBuf {
        self.cache_dir
            .join("bundled")
            .join(BUNDLED_PROTOCOL_VERSION)
    }
}

/// `<home>/.cache/cokodo` — pure, no I/O.
pub fn default_cache_dir_at(home: &Path) -> PathBuf {
    home.join(".cache").join("cokodo")
}
