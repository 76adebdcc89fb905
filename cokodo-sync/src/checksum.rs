//! SHA-256 checksums over the locked part of a protocol tree.
//!
//! Digests are taken over the exact file bytes: no line-ending
//! normalisation, so a CRLF conversion shows up as a change.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde_json::Value;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use cokodo_core::{tree::relative_path, ProtocolTree, Scope};

use crate::error::{io_err, SyncError};
use crate::lint::LintFinding;
use crate::manifest_store;

/// Rule name attached to every finding produced by [`verify`].
pub const INTEGRITY_RULE: &str = "integrity";

/// Lowercase hex SHA-256 of `bytes`.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Lowercase hex SHA-256 of the file at `path`, read in chunks.
pub fn hash_file(path: &Path) -> Result<String, SyncError> {
    let mut file = std::fs::File::open(path).map_err(|e| io_err(path, e))?;
    let mut h = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| io_err(path, e))?;
        if n == 0 {
            break;
        }
        h.update(&buf[..n]);
    }
    Ok(hex::encode(h.finalize()))
}

/// Every regular file under the locked directories plus each entry file
/// that exists, as sorted `/`-separated paths relative to `root`.
pub fn protocol_files(root: &Path, scope: &Scope) -> Vec<String> {
    let mut files = Vec::new();

    for entry in &scope.entry_files {
        if root.join(entry).is_file() {
            files.push(entry.clone());
        }
    }

    for dir in &scope.locked_dirs {
        let base = root.join(dir);
        if !base.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&base).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("skipping unreadable entry under {}: {err}", base.display());
                    continue;
                }
            };
            // Symlinks count when they resolve to a file, same as entry files.
            let is_file = if entry.path_is_symlink() {
                entry.path().is_file()
            } else {
                entry.file_type().is_file()
            };
            if !is_file {
                if entry.path_is_symlink() {
                    tracing::debug!("skipping symlink {}", entry.path().display());
                }
                continue;
            }
            match relative_path(root, entry.path()) {
                Some(rel) => files.push(rel),
                None => tracing::warn!("skipping non-UTF-8 path {}", entry.path().display()),
            }
        }
    }

    files.sort();
    files.dedup();
    files
}

/// Digest of every protocol file in `tree`.
pub fn generate(tree: &ProtocolTree) -> Result<BTreeMap<String, String>, SyncError> {
    let mut out = BTreeMap::new();
    for rel in protocol_files(tree.root(), tree.scope()) {
        let digest = hash_file(&tree.path_of(&rel))?;
        out.insert(rel, digest);
    }
    Ok(out)
}

/// Compare recorded checksums against the files on disk.
///
/// A manifest without checksums (or no manifest) yields a single failing
/// finding; otherwise there is one finding per recorded path.
pub fn verify(tree: &ProtocolTree) -> Vec<LintFinding> {
    let recorded = tree
        .manifest()
        .and_then(|m| m.checksums.as_ref())
        .filter(|c| !c.is_empty());
    let Some(recorded) = recorded else {
        return vec![LintFinding::fail(
            INTEGRITY_RULE,
            "No checksums found in manifest",
        )];
    };

    let mut findings = Vec::with_capacity(recorded.len());
    for (rel, expected) in recorded {
        let path = tree.path_of(rel);
        if !path.is_file() {
            findings.push(LintFinding::fail(INTEGRITY_RULE, "file missing").with_file(rel));
            continue;
        }
        let finding = match hash_file(&path) {
            Ok(actual) if actual.eq_ignore_ascii_case(expected) => {
                LintFinding::pass(INTEGRITY_RULE, "ok")
            }
            Ok(actual) => {
                tracing::debug!("{rel}: expected {expected}, found {actual}");
                LintFinding::fail(INTEGRITY_RULE, "hash mismatch")
            }
            Err(err) => LintFinding::fail(INTEGRITY_RULE, format!("unreadable: {err}")),
        };
        findings.push(finding.with_file(rel));
    }
    findings
}

/// Recompute checksums and store them in the manifest's `checksums` key.
///
/// Requires an existing manifest. Every other key is kept as written.
pub fn update_checksums(tree: &ProtocolTree) -> Result<BTreeMap<String, String>, SyncError> {
    let checksums = generate(tree)?;
    let as_json: serde_json::Map<String, Value> = checksums
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    manifest_store::rewrite(tree.root(), |obj| {
        obj.insert("checksums".to_string(), Value::Object(as_json));
    })?;
    tracing::info!(
        "updated {} checksums in {}",
        checksums.len(),
        tree.manifest_path().display()
    );
    Ok(checksums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            hash_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn file_and_bytes_agree() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", "line1\r\nline2\n");
        assert_eq!(
            hash_file(&tmp.path().join("a.md")).unwrap(),
            hash_bytes(b"line1\r\nline2\n")
        );
        assert_ne!(hash_bytes(b"line1\r\n"), hash_bytes(b"line1\n"));
    }

    #[test]
    fn protocol_files_cover_locked_dirs_and_entry_files_only() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "start-here.md", "# Start");
        write(tmp.path(), "core/rules.md", "r");
        write(tmp.path(), "core/stack-specs/python.md", "p");
        write(tmp.path(), "skills/guardian/SKILL.md", "s");
        write(tmp.path(), "project/context.md", "c");
        write(tmp.path(), "notes.md", "n");
        write(tmp.path(), "manifest.json", "{}");

        let files = protocol_files(tmp.path(), &Scope::default());
        assert_eq!(
            files,
            vec![
                "core/rules.md",
                "core/stack-specs/python.md",
                "skills/guardian/SKILL.md",
                "start-here.md",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_to_files_count_like_entry_files() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "core/real.md", "r");
        write(tmp.path(), "shared/start.md", "# Start");
        symlink(tmp.path().join("core/real.md"), tmp.path().join("core/link.md")).unwrap();
        symlink(tmp.path().join("core/gone.md"), tmp.path().join("core/dangling.md")).unwrap();
        symlink(tmp.path().join("shared/start.md"), tmp.path().join("start-here.md")).unwrap();

        let files = protocol_files(tmp.path(), &Scope::default());
        assert_eq!(files, vec!["core/link.md", "core/real.md", "start-here.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "core/ok.md", "ok");
        std::fs::write(
            tmp.path().join("core").join(OsStr::from_bytes(b"bad\xff.md")),
            "x",
        )
        .unwrap();

        assert_eq!(protocol_files(tmp.path(), &Scope::default()), vec!["core/ok.md"]);
    }

    #[test]
    fn missing_hash_target_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = hash_file(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
    }
}
