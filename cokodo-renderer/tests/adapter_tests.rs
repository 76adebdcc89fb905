//! Generated adapters: locations, required content, and a parse round-trip.

use std::fs;
use std::path::Path;

use rstest::rstest;
use tempfile::TempDir;

use cokodo_parser::{FormatVersion, HybridParser};
use cokodo_renderer::{generate, AdapterKind, WriteResult};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let agent = tmp.path().join(".agent");
    write(&agent, "manifest.json", r#"{"version": "3.1.1"}"#);
    write(&agent, "start-here.md", "# Start Here\n");
    write(&agent, "core/core-rules.md", "# Core Rules\n");
    write(
        &agent,
        "project/context.md",
        "# Project Context\n\n## Project Name\n\nTestProject\n",
    );
    tmp
}

fn generated(root: &Path, kind: AdapterKind) -> String {
    generate(root, &[kind], false).unwrap();
    fs::read_to_string(kind.output_path(root)).unwrap()
}

#[rstest]
#[case(AdapterKind::Cursor)]
#[case(AdapterKind::Claude)]
#[case(AdapterKind::Copilot)]
#[case(AdapterKind::Gemini)]
fn adapter_references_essential_docs(#[case] kind: AdapterKind) {
    let tmp = project();
    let content = generated(tmp.path(), kind);

    for doc in [
        ".agent/start-here.md",
        ".agent/project/context.md",
        ".agent/core/core-rules.md",
    ] {
        assert!(content.contains(doc), "{kind} adapter lacks {doc}");
    }
    assert!(content.to_lowercase().contains("utf-8"), "{kind} adapter lacks UTF-8 rule");
    assert!(content.contains("# TestProject"));
}

#[test]
fn cursor_rule_has_frontmatter() {
    let tmp = project();
    let content = generated(tmp.path(), AdapterKind::Cursor);
    assert!(content.starts_with("---\n"));
    let frontmatter = content.splitn(3, "---").nth(1).unwrap();
    assert!(frontmatter.contains("description:"));
    assert!(frontmatter.contains("alwaysApply: true"));
}

#[test]
fn claude_starts_with_h1() {
    let tmp = project();
    let content = generated(tmp.path(), AdapterKind::Claude);
    assert_eq!(content.lines().next(), Some("# TestProject"));
}

#[test]
fn gemini_uses_import_lines() {
    let tmp = project();
    let content = generated(tmp.path(), AdapterKind::Gemini);
    assert!(content.lines().any(|l| l == "@.agent/start-here.md"));
    assert!(content.lines().any(|l| l == "@.agent/core/core-rules.md"));
}

#[test]
fn legacy_locations_are_not_written() {
    let tmp = project();
    generate(tmp.path(), AdapterKind::all(), false).unwrap();
    assert!(tmp.path().join("AGENTS.md").is_file());
    for old in [
        ".claude/instructions.md",
        ".github/copilot-instructions.md",
        ".agent/rules",
        ".cursorrules",
    ] {
        assert!(!tmp.path().join(old).exists(), "{old} was written");
    }
}

#[test]
fn dry_run_writes_nothing_and_rerun_is_unchanged() {
    let tmp = project();
    let dry = generate(tmp.path(), &[AdapterKind::Claude], true).unwrap();
    assert!(matches!(dry[0], WriteResult::WouldWrite { .. }));
    assert!(!tmp.path().join("CLAUDE.md").exists());

    let first = generate(tmp.path(), &[AdapterKind::Claude], false).unwrap();
    assert!(matches!(first[0], WriteResult::Written { .. }));
    let second = generate(tmp.path(), &[AdapterKind::Claude], false).unwrap();
    assert!(matches!(second[0], WriteResult::Unchanged { .. }));
    assert_eq!(second[0].path(), tmp.path().join("CLAUDE.md"));
}

#[test]
fn missing_protocol_fails() {
    let tmp = TempDir::new().unwrap();
    assert!(generate(tmp.path(), &[AdapterKind::Claude], false).is_err());
}

#[test]
fn generated_adapters_parse_back() {
    let tmp = project();
    generate(tmp.path(), AdapterKind::all(), false).unwrap();

    let parsed = HybridParser::new().parse_all(tmp.path());
    let tools: Vec<&str> = parsed.iter().map(|p| p.tool_name.as_str()).collect();
    assert_eq!(tools, vec!["cursor", "claude", "copilot", "gemini"]);

    for p in &parsed {
        assert_eq!(p.format_version, FormatVersion::Current, "{}", p.tool_name);
        assert_eq!(p.project_name.as_deref(), Some("TestProject"), "{}", p.tool_name);
        assert!(
            p.referenced_files.iter().any(|r| r == ".agent/start-here.md"),
            "{}: {:?}",
            p.tool_name,
            p.referenced_files
        );
        assert!(p.rules.iter().any(|r| r.contains("UTF-8")), "{}", p.tool_name);
    }

    let cursor = &parsed[0];
    assert_eq!(
        cursor.frontmatter.get("alwaysApply").and_then(|v| v.as_bool()),
        Some(true)
    );
}

#[test]
fn stack_specs_follow_manifest_mapping() {
    let tmp = project();
    write(
        &tmp.path().join(".agent"),
        "manifest.json",
        r#"{"version": "3.1.1", "loading_strategy": {"layers": {"stack_specs": {"options": {
            "python": ["custom/py.md"]
        }}}}}"#,
    );
    let content = generated(tmp.path(), AdapterKind::Claude);
    assert!(content.contains("## Stack Specs"));
    assert!(content.contains("`.agent/custom/py.md`"));
    assert!(!content.contains("stack-specs/python.md"));
}
