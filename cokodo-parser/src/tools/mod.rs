//! Per-tool detection and parsing.
//!
//! Each tool is a unit struct implementing [`ToolParser`]; shared text
//! handling lives in [`crate::extract`].

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use cokodo_core::{config::tool_spec_version, tree::relative_path};

use crate::error::{io_err, ParseError};
use crate::extract;
use crate::model::{DetectedFile, FormatVersion, ParsedInstruction};

mod claude;
mod copilot;
mod cursor;
mod gemini;

pub use claude::ClaudeParser;
pub use copilot::CopilotParser;
pub use cursor::CursorParser;
pub use gemini::{GeminiParser, MAX_IMPORT_DEPTH};

/// Detection and parsing for one assistant tool.
pub trait ToolParser {
    /// Registry key, e.g. `"cursor"`.
    fn name(&self) -> &'static str;

    /// Instruction files for this tool under `root`, current format first;
    /// legacy locations are consulted only when no current file exists.
    fn detect(&self, root: &Path) -> Vec<DetectedFile>;

    /// Parse `rel` (relative to `root`).
    fn parse_file(&self, root: &Path, rel: &str) -> Result<ParsedInstruction, ParseError>;
}

// ---------------------------------------------------------------------------
// Helpers shared by the tool modules
// ---------------------------------------------------------------------------

pub(crate) fn join_rel(root: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .filter(|p| !p.is_empty())
        .fold(root.to_path_buf(), |acc, p| acc.join(p))
}

pub(crate) fn read(root: &Path, rel: &str) -> Result<String, ParseError> {
    let path = join_rel(root, rel);
    std::fs::read_to_string(&path).map_err(|e| io_err(path, e))
}

/// Sorted relative paths of files in `dir` whose name ends with `suffix`.
/// With `recursive`, subdirectories are searched too.
pub(crate) fn files_with_suffix(
    root: &Path,
    dir: &Path,
    suffix: &str,
    recursive: bool,
) -> Vec<String> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let walker = WalkDir::new(dir).min_depth(1);
    let walker = if recursive { walker } else { walker.max_depth(1) };
    let mut out: Vec<String> = walker
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(suffix))
        .filter_map(|e| relative_path(root, e.path()))
        .collect();
    out.sort();
    out
}

/// `ParsedInstruction` for a markdown file with optional frontmatter.
///
/// Project name, rules and sections come from the body; references from
/// the whole file.
pub(crate) fn markdown_instruction(
    tool: &'static str,
    rel: &str,
    content: String,
    format_version: FormatVersion,
    with_frontmatter: bool,
) -> ParsedInstruction {
    let (frontmatter, body) = if with_frontmatter {
        extract::frontmatter(&content)
    } else {
        (Default::default(), content.as_str())
    };
    let project_name = extract::project_name(body);
    let rules = extract::rules(body);
    let sections = extract::sections(body);
    let referenced_files = extract::agent_references(&content);
    ParsedInstruction {
        tool_name: tool.to_string(),
        format_version,
        spec_version: tool_spec_version(tool).to_string(),
        source_path: rel.to_string(),
        raw_content: content,
        frontmatter,
        project_name,
        referenced_files,
        imports: Vec::new(),
        rules,
        sections,
    }
}
