//! # cokodo-parser
//!
//! Detects and parses the instruction files AI coding assistants read
//! (Cursor, Claude, Copilot, Gemini) into one [`ParsedInstruction`] shape.
//!
//! - [`extract`]: frontmatter, references, sections, rules, imports
//! - [`tools`]: one [`ToolParser`] per assistant
//! - [`hybrid`]: the fixed registry, [`HybridParser`]

pub mod error;
pub mod extract;
pub mod hybrid;
pub mod model;
pub mod tools;

pub use error::ParseError;
pub use hybrid::HybridParser;
pub use model::{DetectedFile, FormatVersion, FrontmatterValue, ParsedInstruction};
pub use tools::{ToolParser, MAX_IMPORT_DEPTH};
