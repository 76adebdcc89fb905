//! Protocol files compiled into the binary.

use std::path::Path;

use crate::error::SourceError;

/// All bundled protocol files as `(relative_path, contents)`.
pub const FILES: &[(&str, &str)] = &[
    ("manifest.json", include_str!("bundled/manifest.json")),
    ("start-here.md", include_str!("bundled/start-here.md")),
    ("core/core-rules.md", include_str!("bundled/core/core-rules.md")),
    ("core/conventions.md", include_str!("bundled/core/conventions.md")),
    (
        "core/stack-specs/python.md",
        include_str!("bundled/core/stack-specs/python.md"),
    ),
    (
        "core/stack-specs/rust.md",
        include_str!("bundled/core/stack-specs/rust.md"),
    ),
    (
        "core/workflows/bug-prevention.md",
        include_str!("bundled/core/workflows/bug-prevention.md"),
    ),
    (
        "core/workflows/documentation.md",
        include_str!("bundled/core/workflows/documentation.md"),
    ),
    (
        "core/workflows/review-process.md",
        include_str!("bundled/core/workflows/review-process.md"),
    ),
    (
        "core/workflows/testing.md",
        include_str!("bundled/core/workflows/testing.md"),
    ),
    ("meta/protocol-adr.md", include_str!("bundled/meta/protocol-adr.md")),
    ("project/context.md", include_str!("bundled/project/context.md")),
    ("project/tech-stack.md", include_str!("bundled/project/tech-stack.md")),
    (
        "skills/guardian/SKILL.md",
        include_str!("bundled/skills/guardian/SKILL.md"),
    ),
];

/// Write every bundled file under `dir`, leaving files that already hold
/// the same contents untouched.
pub fn materialize(dir: &Path) -> Result<(), SourceError> {
    for (rel, contents) in FILES {
        let path = rel.split('/').fold(dir.to_path_buf(), |acc, p| acc.join(p));
        if std::fs::read_to_string(&path).is_ok_and(|existing| existing == *contents) {
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SourceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, contents).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("materialized bundled file {rel}");
    }
    Ok(())
}
