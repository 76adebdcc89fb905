//! Structural checks over a project's protocol directory.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use cokodo_core::{agent_dir, ProtocolTree, TreeError, AGENT_DIR};
use cokodo_parser::HybridParser;

use crate::checksum;

/// Directories every protocol tree is expected to have.
pub const STANDARD_DIRS: &[&str] = &["core", "meta", "project", "skills"];

/// Files the project subtree must provide.
pub const REQUIRED_PROJECT_FILES: &[&str] = &["context.md", "tech-stack.md"];

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// One check outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFinding {
    pub rule: String,
    pub passed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl LintFinding {
    pub fn pass(rule: &str, message: impl Into<String>) -> Self {
        Self::new(rule, true, message)
    }

    pub fn fail(rule: &str, message: impl Into<String>) -> Self {
        Self::new(rule, false, message)
    }

    fn new(rule: &str, passed: bool, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            passed,
            message: message.into(),
            file: None,
            line: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// `file:line` or `file`, if any location is attached.
    pub fn location(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{file}:{line}")),
            (Some(file), None) => Some(file.clone()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintRule {
    DirectoryStructure,
    RequiredFiles,
    Integrity,
    AdapterReferences,
}

impl LintRule {
    pub fn all() -> &'static [LintRule] {
        &[
            LintRule::DirectoryStructure,
            LintRule::RequiredFiles,
            LintRule::Integrity,
            LintRule::AdapterReferences,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            LintRule::DirectoryStructure => "directory-structure",
            LintRule::RequiredFiles => "required-files",
            LintRule::Integrity => checksum::INTEGRITY_RULE,
            LintRule::AdapterReferences => "adapter-references",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|r| r.name() == name)
    }
}

impl fmt::Display for LintRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Linter
// ---------------------------------------------------------------------------

pub struct Linter {
    project_root: PathBuf,
    tree: ProtocolTree,
}

impl Linter {
    /// Lint `<project_root>/.agent`.
    pub fn new(project_root: impl Into<PathBuf>) -> Result<Self, TreeError> {
        let project_root = project_root.into();
        let tree = ProtocolTree::open(agent_dir(&project_root))?;
        Ok(Self { project_root, tree })
    }

    pub fn tree(&self) -> &ProtocolTree {
        &self.tree
    }

    pub fn lint_all(&self) -> Vec<LintFinding> {
        LintRule::all()
            .iter()
            .flat_map(|rule| self.run(*rule))
            .collect()
    }

    /// Run a single rule by name; an unknown name yields no findings.
    pub fn lint_rule(&self, name: &str) -> Vec<LintFinding> {
        match LintRule::from_name(name) {
            Some(rule) => self.run(rule),
            None => {
                tracing::warn!("unknown lint rule '{name}'");
                Vec::new()
            }
        }
    }

    pub fn run(&self, rule: LintRule) -> Vec<LintFinding> {
        match rule {
            LintRule::DirectoryStructure => self.check_directory_structure(),
            LintRule::RequiredFiles => self.check_required_files(),
            LintRule::Integrity => checksum::verify(&self.tree),
            LintRule::AdapterReferences => self.check_adapter_references(),
        }
    }

    fn check_directory_structure(&self) -> Vec<LintFinding> {
        let rule = LintRule::DirectoryStructure.name();
        STANDARD_DIRS
            .iter()
            .map(|dir| {
                let finding = if self.tree.path_of(dir).is_dir() {
                    LintFinding::pass(rule, format!("{dir}/ exists"))
                } else {
                    LintFinding::fail(rule, format!("{dir}/ directory is missing"))
                };
                finding.with_file(format!("{dir}/"))
            })
            .collect()
    }

    fn check_required_files(&self) -> Vec<LintFinding> {
        let rule = LintRule::RequiredFiles.name();
        let mut findings = Vec::new();

        for entry in &self.tree.scope().entry_files {
            findings.push(file_finding(rule, &self.tree, entry));
        }

        let project_dir = self.tree.scope().project_dir.clone();
        if !self.tree.path_of(&project_dir).is_dir() {
            findings.push(
                LintFinding::fail(rule, format!("{project_dir}/ directory does not exist"))
                    .with_file(format!("{project_dir}/")),
            );
            return findings;
        }
        for name in REQUIRED_PROJECT_FILES {
            findings.push(file_finding(rule, &self.tree, &format!("{project_dir}/{name}")));
        }
        findings
    }

    fn check_adapter_references(&self) -> Vec<LintFinding> {
        let rule = LintRule::AdapterReferences.name();
        let mut findings = Vec::new();

        for parsed in HybridParser::new().parse_all(&self.project_root) {
            for reference in &parsed.referenced_files {
                let target = reference.trim_end_matches(['.', '/']);
                if !target.starts_with(AGENT_DIR) {
                    continue;
                }
                let line = parsed
                    .raw_content
                    .lines()
                    .position(|l| l.contains(reference.as_str()))
                    .map(|i| i + 1);
                let path = target
                    .split('/')
                    .fold(self.project_root.clone(), |acc, part| acc.join(part));
                let finding = if path.exists() {
                    LintFinding::pass(rule, format!("{target} resolves"))
                } else {
                    LintFinding::fail(rule, format!("broken reference: {target}"))
                };
                let finding = finding.with_file(parsed.source_path.clone());
                findings.push(match line {
                    Some(line) => finding.with_line(line),
                    None => finding,
                });
            }
        }
        findings
    }
}

fn file_finding(rule: &str, tree: &ProtocolTree, rel: &str) -> LintFinding {
    let finding = if tree.path_of(rel).is_file() {
        LintFinding::pass(rule, format!("{rel} exists"))
    } else {
        LintFinding::fail(rule, format!("{rel} is missing"))
    };
    finding.with_file(rel)
}
