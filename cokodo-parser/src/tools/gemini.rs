//! Gemini: `GEMINI.md` with `@path` imports, legacy `.agent/rules/*.md`.

use std::collections::HashSet;
use std::path::Path;

use cokodo_core::config::tool_spec_version;

use super::{files_with_suffix, join_rel, read, ToolParser};
use crate::error::ParseError;
use crate::extract;
use crate::model::{DetectedFile, FormatVersion, ParsedInstruction};

const NAME: &str = "gemini";
const CURRENT_FILE: &str = "GEMINI.md";
const LEGACY_DIR: &str = ".agent/rules/";

/// Import nesting followed from the top-level file.
pub const MAX_IMPORT_DEPTH: usize = 5;

#[derive(Debug, Default, Clone, Copy)]
pub struct GeminiParser;

impl ToolParser for GeminiParser {
    fn name(&self) -> &'static str {
        NAME
    }

    fn detect(&self, root: &Path) -> Vec<DetectedFile> {
        if root.join(CURRENT_FILE).is_file() {
            return vec![DetectedFile::new(NAME, CURRENT_FILE, FormatVersion::Current)];
        }
        let rules_dir = root.join(".agent").join("rules");
        files_with_suffix(root, &rules_dir, ".md", false)
            .into_iter()
            .filter(|rel| !rel.to_ascii_uppercase().ends_with("/README.MD"))
            .map(|rel| DetectedFile::new(NAME, rel, FormatVersion::Legacy))
            .collect()
    }

    fn parse_file(&self, root: &Path, rel: &str) -> Result<ParsedInstruction, ParseError> {
        let content = read(root, rel)?;
        let format = if rel.starts_with(LEGACY_DIR) {
            FormatVersion::Legacy
        } else {
            FormatVersion::Current
        };

        let imports = extract::imports(&content);
        let mut referenced = extract::agent_references(&content);
        for line in &imports {
            push_unique(&mut referenced, extract::import_path(line));
        }
        if format == FormatVersion::Current && !imports.is_empty() {
            for path in expand_imports(root, &content) {
                push_unique(&mut referenced, &path);
            }
        }

        Ok(ParsedInstruction {
            tool_name: NAME.to_string(),
            format_version: format,
            spec_version: tool_spec_version(NAME).to_string(),
            source_path: rel.to_string(),
            frontmatter: Default::default(),
            project_name: extract::project_name(&content),
            referenced_files: referenced,
            imports,
            rules: extract::rules(&content),
            sections: extract::sections(&content),
            raw_content: content,
        })
    }
}

/// Import targets reachable from `content`, depth-first, each at most once.
///
/// Targets are resolved against `root`; a missing or unreadable target is
/// listed but not followed.
pub fn expand_imports(root: &Path, content: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut found = Vec::new();
    let mut stack: Vec<(std::vec::IntoIter<String>, usize)> =
        vec![(import_targets(content).into_iter(), 0)];

    while let Some((pending, depth)) = stack.last_mut() {
        let depth = *depth;
        let Some(path) = pending.next() else {
            stack.pop();
            continue;
        };
        if !seen.insert(path.clone()) {
            continue;
        }
        found.push(path.clone());
        if depth + 1 >= MAX_IMPORT_DEPTH {
            continue;
        }
        match std::fs::read_to_string(join_rel(root, &path)) {
            Ok(sub) => stack.push((import_targets(&sub).into_iter(), depth + 1)),
            Err(err) => tracing::debug!("import {path} not followed: {err}"),
        }
    }
    found
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|r| r == item) {
        list.push(item.to_string());
    }
}

fn import_targets(content: &str) -> Vec<String> {
    extract::imports(content)
        .iter()
        .map(|line| extract::import_path(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn chain_is_cut_at_max_depth() {
        let tmp = TempDir::new().unwrap();
        for i in 0..8 {
            std::fs::write(tmp.path().join(format!("f{i}.md")), format!("@f{}.md\n", i + 1))
                .unwrap();
        }
        let found = expand_imports(tmp.path(), "@f0.md\n");
        assert_eq!(found, vec!["f0.md", "f1.md", "f2.md", "f3.md", "f4.md"]);
    }

    #[test]
    fn missing_target_is_listed_but_not_followed() {
        let tmp = TempDir::new().unwrap();
        let found = expand_imports(tmp.path(), "@nope.md\n@.agent/start-here.md\n");
        assert_eq!(found, vec!["nope.md", ".agent/start-here.md"]);
    }

    #[test]
    fn legacy_rules_skip_readme() {
        let tmp = TempDir::new().unwrap();
        let rules = tmp.path().join(".agent/rules");
        std::fs::create_dir_all(&rules).unwrap();
        std::fs::write(rules.join("README.md"), "# readme").unwrap();
        std::fs::write(rules.join("b.md"), "# B").unwrap();
        std::fs::write(rules.join("a.md"), "# A").unwrap();

        let found = GeminiParser.detect(tmp.path());
        let paths: Vec<&str> = found.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec![".agent/rules/a.md", ".agent/rules/b.md"]);
        assert!(found.iter().all(|d| d.format_version == FormatVersion::Legacy));

        let parsed = GeminiParser.parse_file(tmp.path(), ".agent/rules/a.md").unwrap();
        assert_eq!(parsed.format_version, FormatVersion::Legacy);
    }
}
