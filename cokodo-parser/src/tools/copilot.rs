//! Copilot: `AGENTS.md`; otherwise the legacy
//! `.github/copilot-instructions.md`; otherwise
//! `.github/instructions/*.instructions.md`.

use std::path::Path;

use super::{files_with_suffix, markdown_instruction, read, ToolParser};
use crate::error::ParseError;
use crate::model::{DetectedFile, FormatVersion, ParsedInstruction};

const NAME: &str = "copilot";
const CURRENT_FILE: &str = "AGENTS.md";
const LEGACY_FILE: &str = ".github/copilot-instructions.md";

#[derive(Debug, Default, Clone, Copy)]
pub struct CopilotParser;

impl ToolParser for CopilotParser {
    fn name(&self) -> &'static str {
        NAME
    }

    fn detect(&self, root: &Path) -> Vec<DetectedFile> {
        if root.join(CURRENT_FILE).is_file() {
            return vec![DetectedFile::new(NAME, CURRENT_FILE, FormatVersion::Current)];
        }
        let github = root.join(".github");
        if github.join("copilot-instructions.md").is_file() {
            return vec![DetectedFile::new(NAME, LEGACY_FILE, FormatVersion::Legacy)];
        }
        files_with_suffix(root, &github.join("instructions"), ".instructions.md", false)
            .into_iter()
            .map(|rel| DetectedFile::new(NAME, rel, FormatVersion::Current))
            .collect()
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

    fn detected(root: &std::path::Path) -> Vec<(String, FormatVersion)> {
        CopilotParser
            .detect(root)
            .into_iter()
            .map(|d| (d.path, d.format_version))
            .collect()
    }

    #[test]
    fn legacy_file_shadows_scoped_instructions() {
        let tmp = TempDir::new().unwrap();
        let github = tmp.path().join(".github");
        std::fs::create_dir_all(github.join("instructions")).unwrap();
        std::fs::write(github.join("copilot-instructions.md"), "# Repo").unwrap();
        std::fs::write(github.join("instructions/rust.instructions.md"), "# Rust").unwrap();

        assert_eq!(
            detected(tmp.path()),
            vec![(LEGACY_FILE.to_string(), FormatVersion::Legacy)]
        );
    }

    #[test]
    fn scoped_instructions_when_nothing_else_exists() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".github/instructions");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("rust.instructions.md"), "# Rust").unwrap();
        std::fs::write(dir.join("a.instructions.md"), "# A").unwrap();
        std::fs::write(dir.join("readme.md"), "# no").unwrap();

        assert_eq!(
            detected(tmp.path()),
            vec![
                (".github/instructions/a.instructions.md".to_string(), FormatVersion::Current),
                (".github/instructions/rust.instructions.md".to_string(), FormatVersion::Current),
            ]
        );
    }

    #[test]
    fn agents_md_shadows_everything_else() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(".github")).unwrap();
        std::fs::write(tmp.path().join(".github/copilot-instructions.md"), "# Repo").unwrap();
        std::fs::write(tmp.path().join("AGENTS.md"), "# Demo").unwrap();

        let found = CopilotParser.detect(tmp.path());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "AGENTS.md");
    }
}
