//! Tera rendering: [`AdapterKind`] and [`Renderer`].
//!
//! | Adapter | Output path                        |
//! |---------|------------------------------------|
//! | Cursor  | `.cursor/rules/agent-protocol.mdc` |
//! | Claude  | `CLAUDE.md`                        |
//! | Copilot | `AGENTS.md`                        |
//! | Gemini  | `GEMINI.md`                        |

use std::fmt;
use std::path::{Path, PathBuf};

use tera::Tera;

use crate::context::AdapterContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("_partials/protocol.tera", include_str!("templates/_partials/protocol.tera")),
    ("_partials/footer.tera", include_str!("templates/_partials/footer.tera")),
    ("cursor.mdc.tera", include_str!("templates/cursor.mdc.tera")),
    ("claude.md.tera", include_str!("templates/claude.md.tera")),
    ("copilot.md.tera", include_str!("templates/copilot.md.tera")),
    ("gemini.md.tera", include_str!("templates/gemini.md.tera")),
];

fn build_tera() -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    // Added together so includes resolve regardless of order.
    tera.add_raw_templates(TPLS.iter().copied())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// AdapterKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    Cursor,
    Claude,
    Copilot,
    Gemini,
}

impl AdapterKind {
    pub fn all() -> &'static [AdapterKind] {
        &[
            AdapterKind::Cursor,
            AdapterKind::Claude,
            AdapterKind::Copilot,
            AdapterKind::Gemini,
        ]
    }

    /// Same keys the parser registry uses.
    pub fn name(&self) -> &'static str {
        match self {
            AdapterKind::Cursor => "cursor",
            AdapterKind::Claude => "claude",
            AdapterKind::Copilot => "copilot",
            AdapterKind::Gemini => "gemini",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, RenderError> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| RenderError::UnknownAdapter {
                name: name.to_string(),
                known: Self::all()
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            AdapterKind::Cursor => "cursor.mdc.tera",
            AdapterKind::Claude => "claude.md.tera",
            AdapterKind::Copilot => "copilot.md.tera",
            AdapterKind::Gemini => "gemini.md.tera",
        }
    }

    /// `/`-separated, relative to the project root.
    pub fn relative_path(&self) -> &'static str {
        match self {
            AdapterKind::Cursor => ".cursor/rules/agent-protocol.mdc",
            AdapterKind::Claude => "CLAUDE.md",
            AdapterKind::Copilot => "AGENTS.md",
            AdapterKind::Gemini => "GEMINI.md",
        }
    }

    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        self.relative_path()
            .split('/')
            .fold(project_root.to_path_buf(), |acc, part| acc.join(part))
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        Ok(Self { tera: build_tera()? })
    }

    /// Render one adapter. Returns `(output_path, content)`.
    pub fn render(
        &self,
        ctx: &AdapterContext,
        project_root: &Path,
        kind: AdapterKind,
    ) -> Result<(PathBuf, String), RenderError> {
        let mut tera_ctx = ctx.to_tera_context()?;
        tera_ctx.insert("tool", kind.name());
        let content = self.tera.render(kind.template_name(), &tera_ctx)?;
        tracing::debug!("rendered {} ({} bytes)", kind, content.len());
        Ok((kind.output_path(project_root), content))
    }

    /// Render every kind in `kinds`, in order.
    pub fn render_all(
        &self,
        ctx: &AdapterContext,
        project_root: &Path,
        kinds: &[AdapterKind],
    ) -> Result<Vec<(PathBuf, String)>, RenderError> {
        kinds
            .iter()
            .map(|kind| self.render(ctx, project_root, *kind))
            .collect()
    }
}
