//! Values the adapter templates are rendered from.

use std::path::Path;

use serde::Serialize;

use cokodo_core::{ProtocolTree, AGENT_DIR};
use cokodo_parser::extract;

use crate::error::RenderError;

/// Used when neither `project/context.md` nor the directory name gives one.
pub const FALLBACK_PROJECT_NAME: &str = "Project";

/// Files every adapter points the assistant at, in reading order.
pub const ESSENTIAL_DOCS: &[(&str, &str)] = &[
    ("start-here.md", "protocol entry point, read first"),
    ("project/context.md", "what this project is and who it is for"),
    ("core/core-rules.md", "non-negotiable rules for every change"),
];

pub const KEY_RULES: &[&str] = &[
    "Read `.agent/start-here.md` at the start of every task.",
    "Encode every text file as UTF-8 without BOM.",
    "Treat `.agent/core/` as read-only; project facts belong in `.agent/project/`.",
    "When instructions conflict, `.agent/core/core-rules.md` wins.",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocRef {
    /// Project-relative, e.g. `.agent/start-here.md`.
    pub path: String,
    pub title: String,
}

/// A stack declared under `stack_specs.options` and the files it loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackRef {
    pub name: String,
    /// Project-relative, as listed in the manifest.
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdapterContext {
    pub project_name: String,
    pub agent_dir: String,
    pub essential_docs: Vec<DocRef>,
    pub key_rules: Vec<String>,
    pub stacks: Vec<StackRef>,
    pub protocol_version: Option<String>,
    pub generator_version: String,
}

impl AdapterContext {
    /// Build the context for `project_root` from the protocol tree at
    /// `agent_dir`.
    pub fn from_protocol(project_root: &Path, agent_dir: &Path) -> Result<Self, RenderError> {
        let tree = ProtocolTree::open(agent_dir)?;
        let project_name = tree
            .read_text("project/context.md")
            .ok()
            .and_then(|text| project_name_from_context(&text))
            .or_else(|| {
                project_root
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| FALLBACK_PROJECT_NAME.to_string());

        Ok(Self {
            project_name,
            agent_dir: AGENT_DIR.to_string(),
            essential_docs: ESSENTIAL_DOCS
                .iter()
                .map(|(rel, title)| DocRef {
                    path: format!("{AGENT_DIR}/{rel}"),
                    title: (*title).to_string(),
                })
                .collect(),
            key_rules: KEY_RULES.iter().map(|r| (*r).to_string()).collect(),
            stacks: stack_refs(&tree),
            protocol_version: tree.version().map(str::to_string),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        Ok(tera::Context::from_serialize(self)?)
    }
}

fn stack_refs(tree: &ProtocolTree) -> Vec<StackRef> {
    tree.loading_strategy()
        .and_then(|s| s.layers.stack_specs.as_ref())
        .map(|specs| {
            specs
                .options
                .iter()
                .map(|(name, files)| StackRef {
                    name: name.clone(),
                    files: files.iter().map(|f| format!("{AGENT_DIR}/{f}")).collect(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// First non-empty line under `## Project Name`.
pub fn project_name_from_context(text: &str) -> Option<String> {
    extract::sections(text)
        .into_iter()
        .find(|(heading, _)| heading == "Project Name")
        .and_then(|(_, body)| {
            body.lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn project_name_is_first_line_of_section() {
        let text = "# Project Context\n\n## Project Name\n\n  TestProject  \nmore\n## Other\nx\n";
        assert_eq!(project_name_from_context(text).as_deref(), Some("TestProject"));
        assert_eq!(project_name_from_context("## Project Name\n\n"), None);
        assert_eq!(project_name_from_context("# Nothing here"), None);
    }

    #[test]
    fn falls_back_to_directory_name() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("my-service");
        fs::create_dir_all(root.join(".agent")).unwrap();

        let ctx = AdapterContext::from_protocol(&root, &root.join(".agent")).unwrap();
        assert_eq!(ctx.project_name, "my-service");
        assert_eq!(ctx.protocol_version, None);
        assert!(ctx.stacks.is_empty());
        assert_eq!(ctx.essential_docs[0].path, ".agent/start-here.md");
    }

    #[test]
    fn stacks_carry_manifest_file_lists() {
        let tmp = TempDir::new().unwrap();
        let agent = tmp.path().join(".agent");
        fs::create_dir_all(&agent).unwrap();
        fs::write(
            agent.join("manifest.json"),
            r#"{"version": "1.0.0", "loading_strategy": {"layers": {"stack_specs": {"options": {
                "python": ["custom/py.md", "custom/py-test.md"],
                "rust": ["core/stack-specs/rust.md"]
            }}}}}"#,
        )
        .unwrap();

        let ctx = AdapterContext::from_protocol(tmp.path(), &agent).unwrap();
        assert_eq!(
            ctx.stacks,
            vec![
                StackRef {
                    name: "python".into(),
                    files: vec![".agent/custom/py.md".into(), ".agent/custom/py-test.md".into()],
                },
                StackRef {
                    name: "rust".into(),
                    files: vec![".agent/core/stack-specs/rust.md".into()],
                },
            ]
        );
    }

    #[test]
    fn missing_protocol_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = AdapterContext::from_protocol(tmp.path(), &tmp.path().join(".agent"));
        assert!(matches!(err, Err(RenderError::Tree(_))));
    }
}
