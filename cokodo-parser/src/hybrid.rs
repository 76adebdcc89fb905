//! Fixed registry of tool parsers.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ParseError;
use crate::model::{DetectedFile, ParsedInstruction};
use crate::tools::{ClaudeParser, CopilotParser, CursorParser, GeminiParser, ToolParser};

/// Runs every registered [`ToolParser`] over a project root.
pub struct HybridParser {
    parsers: Vec<Box<dyn ToolParser>>,
}

impl Default for HybridParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HybridParser {
    /// Registry in fixed order: cursor, claude, copilot, gemini.
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(CursorParser),
                Box::new(ClaudeParser),
                Box::new(CopilotParser),
                Box::new(GeminiParser),
            ],
        }
    }

    pub fn tools(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }

    pub fn parser(&self, tool: &str) -> Result<&dyn ToolParser, ParseError> {
        self.parsers
            .iter()
            .find(|p| p.name() == tool)
            .map(|p| p.as_ref())
            .ok_or_else(|| ParseError::UnknownTool {
                name: tool.to_string(),
                known: self.tools().join(", "),
            })
    }

    /// Detected files per tool; tools with nothing detected are omitted.
    pub fn detect_all(&self, root: &Path) -> BTreeMap<String, Vec<DetectedFile>> {
        self.parsers
            .iter()
            .map(|p| (p.name().to_string(), p.detect(root)))
            .filter(|(_, found)| !found.is_empty())
            .collect()
    }

    /// Parse every detected file of every tool.
    ///
    /// A file that cannot be read is logged and left out.
    pub fn parse_all(&self, root: &Path) -> Vec<ParsedInstruction> {
        let mut out = Vec::new();
        for parser in &self.parsers {
            for detected in parser.detect(root) {
                match parser.parse_file(root, &detected.path) {
                    Ok(parsed) => out.push(parsed),
                    Err(err) => tracing::warn!("skipping {}: {err}", detected.path),
                }
            }
        }
        out
    }

    /// Parse every detected file of one tool; the first unreadable file
    /// fails the call.
    pub fn parse_tool(&self, root: &Path, tool: &str) -> Result<Vec<ParsedInstruction>, ParseError> {
        let parser = self.parser(tool)?;
        parser
            .detect(root)
            .iter()
            .map(|d| parser.parse_file(root, &d.path))
            .collect()
    }
}
