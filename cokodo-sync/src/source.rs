//! Where the reference ("remote") protocol tree comes from.
//!
//! Sources are tried in the order given. The bundled source never needs
//! the network and is the only one consulted in offline mode.

use std::path::{Path, PathBuf};

use cokodo_core::{config::BUNDLED_PROTOCOL_VERSION, tree::load_manifest, Settings};

use crate::bundled;
use crate::error::SourceError;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A provider of a protocol directory.
pub trait ProtocolSource {
    /// Short human-readable label used in logs and error messages.
    fn name(&self) -> &str;

    /// Produce `(protocol_root, version)`.
    fn fetch(&self) -> Result<(PathBuf, String), SourceError>;

    /// `true` for the protocol compiled into the binary.
    fn is_bundled(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// DirectorySource
// ---------------------------------------------------------------------------

/// An existing protocol directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    path: PathBuf,
    label: String,
}

impl DirectorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = format!("directory:{}", path.display());
        Self { path, label }
    }
}

impl ProtocolSource for DirectorySource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<(PathBuf, String), SourceError> {
        if !self.path.is_dir() {
            return Err(SourceError::Unavailable {
                name: self.label.clone(),
                reason: format!("{} is not a directory", self.path.display()),
            });
        }
        let version = load_manifest(&self.path)
            .and_then(|m| m.version)
            .unwrap_or_else(|| "unknown".to_string());
        Ok((self.path.clone(), version))
    }
}

// ---------------------------------------------------------------------------
// BundledSource
// ---------------------------------------------------------------------------

/// The protocol shipped inside the binary, unpacked into a cache directory.
#[derive(Debug, Clone)]
pub struct BundledSource {
    dir: PathBuf,
}

impl BundledSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.bundled_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ProtocolSource for BundledSource {
    fn name(&self) -> &str {
        "bundled"
    }

    fn fetch(&self) -> Result<(PathBuf, String), SourceError> {
        bundled::materialize(&self.dir)?;
        Ok((self.dir.clone(), BUNDLED_PROTOCOL_VERSION.to_string()))
    }

    fn is_bundled(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// The tree a source chain settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProtocol {
    pub source: String,
    pub root: PathBuf,
    pub version: String,
}

/// Standard chain: an explicit directory (argument, else
/// `COKODO_PROTOCOL_SOURCE`), then the bundled protocol.
pub fn default_sources(
    settings: &Settings,
    explicit: Option<&Path>,
) -> Vec<Box<dyn ProtocolSource>> {
    let mut sources: Vec<Box<dyn ProtocolSource>> = Vec::new();
    if let Some(dir) = explicit.map(Path::to_path_buf).or_else(|| settings.source_dir.clone()) {
        sources.push(Box::new(DirectorySource::new(dir)));
    }
    sources.push(Box::new(BundledSource::from_settings(settings)));
    sources
}

/// Return the first source that yields a tree.
///
/// With `offline` set only bundled sources are consulted. Each failure is
/// logged at `warn`; if none succeeds the error lists every failure.
pub fn resolve_protocol(
    sources: &[Box<dyn ProtocolSource>],
    offline: bool,
) -> Result<ResolvedProtocol, SourceError> {
    let mut failures = Vec::new();
    for source in sources {
        if offline && !source.is_bundled() {
            tracing::debug!("offline: skipping source {}", source.name());
            continue;
        }
        match source.fetch() {
            Ok((root, version)) => {
                tracing::info!("using protocol {version} from {}", source.name());
                return Ok(ResolvedProtocol {
                    source: source.name().to_string(),
                    root,
                    version,
                });
            }
            Err(err) => {
                tracing::warn!("protocol source {} failed: {err}", source.name());
                failures.push(format!("{}: {err}", source.name()));
            }
        }
    }
    if failures.is_empty() {
        failures.push("no sources configured".to_string());
    }
    Err(SourceError::Exhausted { failures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Failing;

    impl ProtocolSource for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn fetch(&self) -> Result<(PathBuf, String), SourceError> {
            Err(SourceError::Unavailable {
                name: "failing".into(),
                reason: "boom".into(),
            })
        }
    }

    #[test]
    fn directory_source_reads_manifest_version() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("manifest.json"), r#"{"version": "9.9.9"}"#).unwrap();
        let (root, version) = DirectorySource::new(tmp.path()).fetch().unwrap();
        assert_eq!(root, tmp.path());
        assert_eq!(version, "9.9.9");
    }

    #[test]
    fn directory_source_without_manifest_is_unknown_version() {
        let tmp = TempDir::new().unwrap();
        let (_, version) = DirectorySource::new(tmp.path()).fetch().unwrap();
        assert_eq!(version, "unknown");
    }

    #[test]
    fn first_success_wins_after_failures() {
        let cache = TempDir::new().unwrap();
        let sources: Vec<Box<dyn ProtocolSource>> = vec![
            Box::new(Failing),
            Box::new(DirectorySource::new(cache.path().join("missing"))),
            Box::new(BundledSource::new(cache.path().join("bundled"))),
        ];
        let resolved = resolve_protocol(&sources, false).unwrap();
        assert_eq!(resolved.source, "bundled");
        assert_eq!(resolved.version, BUNDLED_PROTOCOL_VERSION);
        assert!(resolved.root.join("manifest.json").is_file());
    }

    #[test]
    fn offline_goes_straight_to_bundled() {
        let cache = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        let sources: Vec<Box<dyn ProtocolSource>> = vec![
            Box::new(DirectorySource::new(local.path())),
            Box::new(BundledSource::new(cache.path())),
        ];
        assert_eq!(resolve_protocol(&sources, true).unwrap().source, "bundled");
        assert!(resolve_protocol(&sources, false)
            .unwrap()
            .source
            .starts_with("directory:"));
    }

    #[test]
    fn exhaustion_lists_every_failure() {
        let tmp = TempDir::new().unwrap();
        let sources: Vec<Box<dyn ProtocolSource>> = vec![
            Box::new(Failing),
            Box::new(DirectorySource::new(tmp.path().join("nope"))),
        ];
        match resolve_protocol(&sources, false).unwrap_err() {
            SourceError::Exhausted { failures } => {
                assert_eq!(failures.len(), 2);
                assert!(failures[0].contains("boom"));
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn default_chain_prefers_explicit_directory() {
        let home = TempDir::new().unwrap();
        let settings = Settings::from_env_at(home.path());
        let explicit = home.path().join("proto");
        let chain = default_sources(&settings, Some(&explicit));
        assert_eq!(chain.len(), 2);
        assert!(chain[0].name().contains("proto"));
        assert!(chain[1].is_bundled());
    }
}
