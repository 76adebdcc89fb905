//! Manifest rewrite with key-order preservation.
//!
//! The manifest is edited as a raw JSON object so that keys this crate does
//! not model (`name`, `description`, vendor extensions, ...) survive a
//! rewrite in their original position. Writes use `<path>.tmp` + rename.

use std::path::Path;

use serde_json::{Map, Value};

use cokodo_core::{tree::load_manifest_strict, TreeError};

use crate::error::{io_err, SyncError};

/// Load `path` as a JSON object, apply `edit`, and save atomically.
///
/// Fails with [`TreeError::ManifestNotFound`] when the file is absent.
pub(crate) fn rewrite(
    root: &Path,
    edit: impl FnOnce(&mut Map<String, Value>),
) -> Result<(), SyncError> {
    // Surfaces ManifestNotFound / Parse with the tree's own error shape.
    load_manifest_strict(root)?;

    let path = root.join(cokodo_core::MANIFEST_FILE);
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let mut value: Value = serde_json::from_str(&contents)
        .map_err(|source| TreeError::Parse {
            path: path.clone(),
            source,
        })?;
    let Some(object) = value.as_object_mut() else {
        return Err(SyncError::ManifestShape { path });
    };
    edit(object);

    let mut json = serde_json::to_string_pretty(&value)?;
    json.push('\n');
    write_atomic(&path, json.as_bytes())
}

/// Write `bytes` to `<path>.tmp`, then rename over `path`.
///
/// Parent directories are created as needed. The temporary file is removed
/// if the rename fails.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = path.with_file_name(format!(
        "{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    ));
    std::fs::write(&tmp, bytes).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}
