//! cokodo core library — protocol tree model, manifest types, context
//! resolution, settings, errors.
//!
//! - [`tree`] — [`ProtocolTree`] and manifest loading
//! - [`types`] — manifest / loading-strategy structs, [`Scope`]
//! - [`resolver`] — `(stack, task)` → ordered file list
//! - [`config`] — [`Settings`] from the environment
//! - [`error`] — [`TreeError`]

pub mod config;
pub mod error;
pub mod resolver;
pub mod tree;
pub mod types;

pub use config::Settings;
pub use error::TreeError;
pub use tree::{agent_dir, ProtocolTree, AGENT_DIR, MANIFEST_FILE};
pub use types::{
    ContextRequest, FileListLayer, Layers, LoadingStrategy, Manifest, MappingsLayer,
    ModulesLayer, OptionsLayer, Ownership, Scope, SkillModule, TaskProfile,
};
