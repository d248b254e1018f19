//! Shared types, error model, and configuration for mindscribe.
//!
//! This crate is the foundation depended on by all other mindscribe crates.
//! It provides:
//! - [`MindscribeError`] — the unified error type
//! - Domain types ([`OutlineNode`], [`Keywords`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_END_MARKER, DEFAULT_FILE_NAME, DEFAULT_START_MARKER, FREEMIND_MIME_TYPE,
    MindMapConfig, OutlineConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from, validate_config,
};
pub use error::{MindscribeError, Result};
pub use types::{Keywords, OutlineNode};
