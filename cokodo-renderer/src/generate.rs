//! Writing rendered adapters to disk.

use std::path::{Path, PathBuf};

use serde::Serialize;

use cokodo_core::agent_dir;

use crate::context::AdapterContext;
use crate::engine::{AdapterKind, Renderer};
use crate::error::{io_err, RenderError};

/// Outcome for one adapter file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteResult {
    Written { path: PathBuf },
    /// Existing file already matches; left alone.
    Unchanged { path: PathBuf },
    /// Dry run: the file would have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }
}

/// Render `kinds` for the project at `project_root` and write them.
///
/// The protocol must exist at `<project_root>/.agent`.
pub fn generate(
    project_root: &Path,
    kinds: &[AdapterKind],
    dry_run: bool,
) -> Result<Vec<WriteResult>, RenderError> {
    let ctx = AdapterContext::from_protocol(project_root, &agent_dir(project_root))?;
    let renderer = Renderer::new()?;

    let mut results = Vec::with_capacity(kinds.len());
    for (path, content) in renderer.render_all(&ctx, project_root, kinds)? {
        results.push(write_output(path, &content, dry_run)?);
    }
    Ok(results)
}

fn write_output(path: PathBuf, content: &str, dry_run: bool) -> Result<WriteResult, RenderError> {
    if std::fs::read_to_string(&path).is_ok_and(|existing| existing == content) {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(WriteResult::Unchanged { path });
    }
    if dry_run {
        return Ok(WriteResult::WouldWrite { path });
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    tracing::info!("wrote {}", path.display());
    Ok(WriteResult::Written { path })
}
