//! Domain types for a protocol tree.
//!
//! The manifest's `loading_strategy` is modelled with one struct per layer
//! kind so that a mis-shaped layer is rejected when the manifest is loaded.
//! Every layer is optional: a missing layer contributes nothing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// `manifest.json` at the root of a protocol tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Protocol version. Non-string values are treated as absent.
    #[serde(default, deserialize_with = "lenient_version")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading_strategy: Option<LoadingStrategy>,
    /// Relative path -> SHA-256 hex digest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksums: Option<BTreeMap<String, String>>,
}

fn lenient_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

/// Layered description of what an assistant should load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadingStrategy {
    #[serde(default)]
    pub layers: Layers,
    #[serde(default)]
    pub task_profiles: BTreeMap<String, TaskProfile>,
}

/// The five known layers, each optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Layers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essential: Option<FileListLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<FileListLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_specs: Option<OptionsLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<MappingsLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<ModulesLayer>,
}

/// Flat file list (`essential`, `context`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileListLayer {
    #[serde(default)]
    pub files: Vec<String>,
}

/// Stack name -> file list (`stack_specs`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionsLayer {
    #[serde(default)]
    pub options: BTreeMap<String, Vec<String>>,
}

/// Workflow name -> file list (`workflows`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MappingsLayer {
    #[serde(default)]
    pub mappings: BTreeMap<String, Vec<String>>,
}

/// Skill name -> module (`skills`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModulesLayer {
    #[serde(default)]
    pub modules: BTreeMap<String, SkillModule>,
}

/// A skill's entry document plus supporting files.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillModule {
    pub entry: String,
    #[serde(default)]
    pub files: Vec<String>,
}

/// A named bundle of workflows and skills loaded together for a task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskProfile {
    #[serde(default)]
    pub workflows: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

// ---------------------------------------------------------------------------
// Context request
// ---------------------------------------------------------------------------

/// Which slice of the protocol an assistant asks for.
///
/// `task` may name a workflow directly or a task-profile id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextRequest {
    pub stack: Option<String>,
    pub task: Option<String>,
}

impl ContextRequest {
    pub fn new(stack: Option<impl Into<String>>, task: Option<impl Into<String>>) -> Self {
        Self {
            stack: stack.map(Into::into),
            task: task.map(Into::into),
        }
    }

    /// The base request: essential + context layers only.
    pub fn base() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Tree partition
// ---------------------------------------------------------------------------

/// Ownership of a relative path inside a protocol tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Protocol-owned; sync may overwrite it.
    Locked,
    /// Lives under the project subtree; sync never touches it.
    Project,
    /// Neither (e.g. `manifest.json`, stray files at the root).
    Unmanaged,
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ownership::Locked => write!(f, "locked"),
            Ownership::Project => write!(f, "project"),
            Ownership::Unmanaged => write!(f, "unmanaged"),
        }
    }
}

/// Partition of a protocol tree into locked and project-owned paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub locked_dirs: Vec<String>,
    pub entry_files: Vec<String>,
    pub project_dir: String,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            locked_dirs: ["core", "adapters", "meta", "scripts", "skills"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            entry_files: vec!["start-here.md".to_string()],
            project_dir: "project".to_string(),
        }
    }
}

impl Scope {
    /// Classify a `/`-separated relative path.
    ///
    /// A leading project directory wins over every locked rule.
    pub fn classify(&self, rel: &str) -> Ownership {
        let first = rel.split('/').next().unwrap_or_default();
        if first == self.project_dir {
            return Ownership::Project;
        }
        if self.entry_files.iter().any(|f| f == rel) {
            return Ownership::Locked;
        }
        if rel.contains('/') && self.locked_dirs.iter().any(|d| d == first) {
            return Ownership::Locked;
        }
        Ownership::Unmanaged
    }

    pub fn is_project(&self, rel: &str) -> bool {
        self.classify(rel) == Ownership::Project
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_minimal_parses() {
        let m: Manifest = serde_json::from_str(r#"{"version": "3.0.0"}"#).unwrap();
        assert_eq!(m.version.as_deref(), Some("3.0.0"));
        assert!(m.loading_strategy.is_none());
        assert!(m.checksums.is_none());
    }

    #[test]
    fn non_string_version_is_absent() {
        let m: Manifest = serde_json::from_str(r#"{"version": 3}"#).unwrap();
        assert!(m.version.is_none());
    }

    #[test]
    fn misshaped_layer_is_rejected() {
        let raw = r#"{"loading_strategy": {"layers": {"essential": {"files": "start-here.md"}}}}"#;
        assert!(serde_json::from_str::<Manifest>(raw).is_err());
    }

    #[test]
    fn skill_module_files_default_empty() {
        let raw = r#"{"loading_strategy": {"layers": {"skills": {"modules": {"g": {"entry": "skills/g/SKILL.md"}}}}}}"#;
        let m: Manifest = serde_json::from_str(raw).unwrap();
        let layers = m.loading_strategy.unwrap().layers;
        let module = &layers.skills.unwrap().modules["g"];
        assert_eq!(module.entry, "skills/g/SKILL.md");
        assert!(module.files.is_empty());
    }

    #[test]
    fn scope_classifies_paths() {
        let scope = Scope::default();
        assert_eq!(scope.classify("start-here.md"), Ownership::Locked);
        assert_eq!(scope.classify("core/core-rules.md"), Ownership::Locked);
        assert_eq!(scope.classify("skills/guardian/SKILL.md"), Ownership::Locked);
        assert_eq!(scope.classify("project/context.md"), Ownership::Project);
        assert_eq!(scope.classify("manifest.json"), Ownership::Unmanaged);
        assert_eq!(scope.classify("core"), Ownership::Unmanaged);
    }

    #[test]
    fn project_prefix_beats_locked_configuration() {
        let scope = Scope {
            locked_dirs: vec!["project".to_string()],
            entry_files: vec!["project/context.md".to_string()],
            project_dir: "project".to_string(),
        };
        assert_eq!(scope.classify("project/context.md"), Ownership::Project);
    }
}
