//! Cursor: `.cursor/rules/*.mdc`, legacy `.cursorrules`.

use std::path::Path;

use super::{files_with_suffix, markdown_instruction, read, ToolParser};
use crate::error::ParseError;
use crate::model::{DetectedFile, FormatVersion, ParsedInstruction};

const NAME: &str = "cursor";
const LEGACY_FILE: &str = ".cursorrules";

#[derive(Debug, Default, Clone, Copy)]
pub struct CursorParser;

impl ToolParser for CursorParser {
    fn name(&self) -> &'static str {
        NAME
    }

    fn detect(&self, root: &Path) -> Vec<DetectedFile> {
        let rules_dir = root.join(".cursor").join("rules");
        let mut found: Vec<DetectedFile> = files_with_suffix(root, &rules_dir, ".mdc", false)
            .into_iter()
            .map(|rel| DetectedFile::new(NAME, rel, FormatVersion::Current))
            .collect();
        if found.is_empty() && root.join(LEGACY_FILE).is_file() {
            found.push(DetectedFile::new(NAME, LEGACY_FILE, FormatVersion::Legacy));
        }
        found
    }

    fn parse_file(&self, root: &Path, rel: &str) -> Result<ParsedInstruction, ParseError> {
        let content = read(root, rel)?;
        // Only .mdc files carry frontmatter.
        let parsed = if rel.ends_with(".mdc") {
            markdown_instruction(NAME, rel, content, FormatVersion::Current, true)
        } else {
            markdown_instruction(NAME, rel, content, FormatVersion::Legacy, false)
        };
        Ok(parsed)
    }
}
