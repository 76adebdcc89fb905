//! Claude: `CLAUDE.md` and `.claude/rules/**/*.md`, legacy
//! `.claude/instructions.md`.

use std::path::Path;

use super::{files_with_suffix, markdown_instruction, read, ToolParser};
use crate::error::ParseError;
use crate::model::{DetectedFile, FormatVersion, ParsedInstruction};

const NAME: &str = "claude";
const CURRENT_FILE: &str = "CLAUDE.md";
const LEGACY_FILE: &str = ".claude/instructions.md";

#[derive(Debug, Default, Clone, Copy)]
pub struct ClaudeParser;

impl ToolParser for ClaudeParser {
    fn name(&self) -> &'static str {
        NAME
    }

    fn detect(&self, root: &Path) -> Vec<DetectedFile> {
        let mut found = Vec::new();
        if root.join(CURRENT_FILE).is_file() {
            found.push(DetectedFile::new(NAME, CURRENT_FILE, FormatVersion::Current));
        }
        let rules_dir = root.join(".claude").join("rules");
        for rel in files_with_suffix(root, &rules_dir, ".md", true) {
            found.push(DetectedFile::new(NAME, rel, FormatVersion::Current));
        }
        if found.is_empty() && root.join(".claude").join("instructions.md").is_file() {
            found.push(DetectedFile::new(NAME, LEGACY_FILE, FormatVersion::Legacy));
        }
        found
    }

    fn parse_file(&self, root: &Path, rel: &str) -> Result<ParsedInstruction, ParseError> {
        let content = read(root, rel)?;
        let format = if rel == LEGACY_FILE {
            FormatVersion::Legacy
        } else {
            FormatVersion::Current
        };
        Ok(markdown_instruction(NAME, rel, content, format, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn nested_rules_are_found_sorted() {
        let tmp = TempDir::new().unwrap();
        let rules = tmp.path().join(".claude/rules");
        std::fs::create_dir_all(rules.join("lang")).unwrap();
        std::fs::write(rules.join("lang/rust.md"), "# Rust").unwrap();
        std::fs::write(rules.join("base.md"), "# Base").unwrap();
        std::fs::write(rules.join("notes.txt"), "skip").unwrap();
        std::fs::write(tmp.path().join("CLAUDE.md"), "# Demo").unwrap();

        let paths: Vec<String> = ClaudeParser
            .detect(tmp.path())
            .into_iter()
            .map(|d| d.path)
            .collect();
        assert_eq!(
            paths,
            vec!["CLAUDE.md", ".claude/rules/base.md", ".claude/rules/lang/rust.md"]
        );
    }

    #[test]
    fn legacy_only_when_nothing_current() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(".claude")).unwrap();
        std::fs::write(tmp.path().join(".claude/instructions.md"), "# Old").unwrap();

        let found = ClaudeParser.detect(tmp.path());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].format_version, FormatVersion::Legacy);
        let parsed = ClaudeParser.parse_file(tmp.path(), &found[0].path).unwrap();
        assert_eq!(parsed.format_version, FormatVersion::Legacy);
    }
}
