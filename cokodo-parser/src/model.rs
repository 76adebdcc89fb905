//! Parser output types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Whether a file sits at a tool's present-day location or a deprecated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVersion {
    Current,
    Legacy,
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatVersion::Current => write!(f, "current"),
            FormatVersion::Legacy => write!(f, "legacy"),
        }
    }
}

/// An instruction file found under a project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedFile {
    pub tool_name: String,
    /// `/`-separated, relative to the project root.
    pub path: String,
    pub format_version: FormatVersion,
}

impl DetectedFile {
    pub(crate) fn new(tool: &str, path: impl Into<String>, format_version: FormatVersion) -> Self {
        Self {
            tool_name: tool.to_string(),
            path: path.into(),
            format_version,
        }
    }
}

/// A scalar frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FrontmatterValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FrontmatterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FrontmatterValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FrontmatterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontmatterValue::Bool(b) => write!(f, "{b}"),
            FrontmatterValue::Int(n) => write!(f, "{n}"),
            FrontmatterValue::Text(s) => f.write_str(s),
        }
    }
}

/// The common shape every tool parser produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedInstruction {
    pub tool_name: String,
    pub format_version: FormatVersion,
    /// Format revision of the tool this parser targets.
    pub spec_version: String,
    /// `/`-separated, relative to the project root.
    pub source_path: String,
    pub raw_content: String,
    pub frontmatter: BTreeMap<String, FrontmatterValue>,
    pub project_name: Option<String>,
    /// `.agent/...` references (and import targets), first-seen order.
    pub referenced_files: Vec<String>,
    /// Raw `@path` lines, marker included.
    pub imports: Vec<String>,
    pub rules: Vec<String>,
    /// Heading -> body, in order of first appearance.
    pub sections: Vec<(String, String)>,
}

impl ParsedInstruction {
    pub fn section(&self, heading: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(h, _)| h == heading)
            .map(|(_, body)| body.as_str())
    }
}
