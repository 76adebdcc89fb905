//! # cokodo-renderer
//!
//! Generates tool-specific adapter files (`CLAUDE.md`, `AGENTS.md`,
//! `GEMINI.md`, a Cursor rule) that point an assistant at the protocol in
//! `.agent/`.
//!
//! - [`context`]: [`AdapterContext`] built from the protocol tree
//! - [`engine`]: embedded Tera templates, [`AdapterKind`], [`Renderer`]
//! - [`generate()`]: render and write, skipping files that already match

pub mod context;
pub mod engine;
pub mod error;
mod generate;

pub use context::{AdapterContext, StackRef};
pub use engine::{AdapterKind, Renderer};
pub use error::RenderError;
pub use generate::{generate, WriteResult};
