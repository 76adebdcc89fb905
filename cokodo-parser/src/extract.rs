//! Text extraction shared by every tool parser.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::model::FrontmatterValue;

static AGENT_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.agent/[\w/.-]+").expect("reference regex is valid"));

/// Section headings whose bullet items count as rules.
pub const RULE_SECTIONS: &[&str] = &["Key Rules", "Rules", "Standards", "Coding Standards"];

/// Split `---`-delimited frontmatter from the body.
///
/// Content without a leading `---` (or with fewer than two delimiters) has
/// no frontmatter and is returned unchanged as the body.
pub fn frontmatter(content: &str) -> (BTreeMap<String, FrontmatterValue>, &str) {
    if !content.trim().starts_with("---") {
        return (BTreeMap::new(), content);
    }
    let mut parts = content.splitn(3, "---");
    let (Some(_), Some(block), Some(body)) = (parts.next(), parts.next(), parts.next()) else {
        return (BTreeMap::new(), content);
    };
    (parse_block(block), body.trim_start_matches('\n'))
}

fn parse_block(block: &str) -> BTreeMap<String, FrontmatterValue> {
    let mut out = BTreeMap::new();
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        out.insert(key.trim().to_string(), scalar(value.trim()));
    }
    out
}

fn scalar(value: &str) -> FrontmatterValue {
    if value.eq_ignore_ascii_case("true") {
        return FrontmatterValue::Bool(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return FrontmatterValue::Bool(false);
    }
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = value.parse() {
            return FrontmatterValue::Int(n);
        }
    }
    FrontmatterValue::Text(value.to_string())
}

/// Every `.agent/...` path mentioned in `content`, first occurrence only.
pub fn agent_references(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    AGENT_REF
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .filter(|r| seen.insert(r.clone()))
        .collect()
}

/// `## ` sections as `(heading, trimmed body)`. Text before the first
/// heading is dropped; a repeated heading keeps its first position and the
/// last body.
pub fn sections(content: &str) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in content.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            flush(current.take(), &mut out);
            current = Some((heading.trim().to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    flush(current, &mut out);
    out
}

fn flush(current: Option<(String, Vec<&str>)>, out: &mut Vec<(String, String)>) {
    let Some((heading, body)) = current else {
        return;
    };
    let body = body.join("\n").trim().to_string();
    match out.iter_mut().find(|(h, _)| *h == heading) {
        Some(slot) => slot.1 = body,
        None => out.push((heading, body)),
    }
}

/// Bullet items (`- text`) under the [`RULE_SECTIONS`] headings.
pub fn rules(content: &str) -> Vec<String> {
    let sections = sections(content);
    let mut out = Vec::new();
    for name in RULE_SECTIONS {
        let Some((_, body)) = sections.iter().find(|(h, _)| h == name) else {
            continue;
        };
        for line in body.lines() {
            if let Some(rule) = line.trim().strip_prefix("- ") {
                let rule = rule.trim();
                if !rule.is_empty() {
                    out.push(rule.to_string());
                }
            }
        }
    }
    out
}

/// Text of the first `# ` heading.
pub fn project_name(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter_map(|l| l.strip_prefix("# "))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

/// `@path` lines, marker included.
pub fn imports(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with('@') && l.len() > 1)
        .map(str::to_string)
        .collect()
}

/// Import target with the `@` marker stripped.
pub fn import_path(line: &str) -> &str {
    line.trim().trim_start_matches('@').trim()
}
