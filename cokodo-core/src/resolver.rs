//! Layered context resolution.
//!
//! Order of contribution:
//! 1. `essential.files`, then `context.files` (always)
//! 2. `stack_specs.options[stack]`
//! 3. `workflows.mappings[task]`, or, if `task` is a task profile, each of
//!    its workflows followed by each skill's entry and files
//!
//! Unknown names contribute nothing. The result keeps the first occurrence
//! of every path.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::tree::ProtocolTree;
use crate::types::{ContextRequest, LoadingStrategy};

/// Resolve the ordered, de-duplicated list of files for `request`.
pub fn resolve(tree: &ProtocolTree, request: &ContextRequest) -> Vec<String> {
    let Some(strategy) = tree.loading_strategy() else {
        return Vec::new();
    };
    resolve_strategy(strategy, request)
}

/// [`resolve`] over an already-loaded strategy.
pub fn resolve_strategy(strategy: &LoadingStrategy, request: &ContextRequest) -> Vec<String> {
    let layers = &strategy.layers;
    let mut out = OrderedSet::default();

    for layer in [&layers.essential, &layers.context].into_iter().flatten() {
        out.extend(&layer.files);
    }

    if let Some(stack) = request.stack.as_deref() {
        match layers.stack_specs.as_ref().and_then(|s| s.options.get(stack)) {
            Some(files) => out.extend(files),
            None => tracing::debug!("stack '{stack}' not in stack_specs; skipped"),
        }
    }

    if let Some(task) = request.task.as_deref() {
        let workflow = layers.workflows.as_ref().and_then(|w| w.mappings.get(task));
        if let Some(files) = workflow {
            out.extend(files);
        } else if let Some(profile) = strategy.task_profiles.get(task) {
            for name in &profile.workflows {
                if let Some(files) = layers.workflows.as_ref().and_then(|w| w.mappings.get(name)) {
                    out.extend(files);
                }
            }
            for name in &profile.skills {
                if let Some(module) = layers.skills.as_ref().and_then(|s| s.modules.get(name)) {
                    out.push(&module.entry);
                    out.extend(&module.files);
                }
            }
        } else {
            tracing::debug!("task '{task}' is neither a workflow nor a task profile; skipped");
        }
    }

    out.into_vec()
}

/// Read the text of every path that exists.
///
/// Paths that are missing or unreadable are left out of the map.
pub fn materialize(tree: &ProtocolTree, paths: &[String]) -> BTreeMap<String, String> {
    let mut content = BTreeMap::new();
    for rel in paths {
        match tree.read_text(rel) {
            Ok(text) => {
                content.insert(rel.clone(), text);
            }
            Err(err) => tracing::debug!("context file omitted: {err}"),
        }
    }
    content
}

/// Stack names declared under `stack_specs.options`.
pub fn available_stacks(tree: &ProtocolTree) -> Vec<String> {
    tree.loading_strategy()
        .and_then(|s| s.layers.stack_specs.as_ref())
        .map(|s| s.options.keys().cloned().collect())
        .unwrap_or_default()
}

/// Workflow names and task-profile ids, sorted and de-duplicated.
pub fn available_tasks(tree: &ProtocolTree) -> Vec<String> {
    let Some(strategy) = tree.loading_strategy() else {
        return Vec::new();
    };
    let mut names: BTreeSet<String> = strategy.task_profiles.keys().cloned().collect();
    if let Some(workflows) = strategy.layers.workflows.as_ref() {
        names.extend(workflows.mappings.keys().cloned());
    }
    names.into_iter().collect()
}

#[derive(Default)]
struct OrderedSet {
    seen: HashSet<String>,
    items: Vec<String>,
}

impl OrderedSet {
    fn push(&mut self, item: &str) {
        if self.seen.insert(item.to_string()) {
            self.items.push(item.to_string());
        }
    }

    fn extend<'a>(&mut self, items: impl IntoIterator<Item = &'a String>) {
        for item in items {
            self.push(item);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Manifest;

    fn strategy(raw: &str) -> LoadingStrategy {
        let manifest: Manifest = serde_json::from_str(raw).unwrap();
        manifest.loading_strategy.unwrap_or_default()
    }

    #[test]
    fn base_keeps_essential_before_context() {
        let s = strategy(
            r#"{"loading_strategy": {"layers": {
                "context": {"files": ["project/context.md"]},
                "essential": {"files": ["start-here.md"]}
            }}}"#,
        );
        assert_eq!(
            resolve_strategy(&s, &ContextRequest::base()),
            vec!["start-here.md", "project/context.md"]
        );
    }

    #[test]
    fn workflow_file_already_in_essential_keeps_earliest_position() {
        let s = strategy(
            r#"{"loading_strategy": {"layers": {
                "essential": {"files": ["start-here.md", "core/shared.md"]},
                "workflows": {"mappings": {"testing": ["core/testing.md", "core/shared.md"]}}
            }}}"#,
        );
        let files = resolve_strategy(&s, &ContextRequest::new(None::<String>, Some("testing")));
        assert_eq!(files, vec!["start-here.md", "core/shared.md", "core/testing.md"]);
    }

    #[test]
    fn workflow_key_wins_over_profile_of_same_name() {
        let s = strategy(
            r#"{"loading_strategy": {
                "layers": {"workflows": {"mappings": {
                    "review": ["wf/review.md"],
                    "other": ["wf/other.md"]
                }}},
                "task_profiles": {"review": {"workflows": ["other"]}}
            }}"#,
        );
        let files = resolve_strategy(&s, &ContextRequest::new(None::<String>, Some("review")));
        assert_eq!(files, vec!["wf/review.md"]);
    }

    #[test]
    fn profile_with_unknown_names_contributes_nothing() {
        let s = strategy(
            r#"{"loading_strategy": {
                "layers": {"essential": {"files": ["a.md"]}},
                "task_profiles": {"t": {"workflows": ["ghost"], "skills": ["phantom"]}}
            }}"#,
        );
        let files = resolve_strategy(&s, &ContextRequest::new(None::<String>, Some("t")));
        assert_eq!(files, vec!["a.md"]);
    }
}
