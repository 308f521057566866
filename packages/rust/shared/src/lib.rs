//! Shared error model and configuration for spacedown.
//!
//! This crate is the foundation depended on by all other spacedown crates.
//! It provides:
//! - [`SpacedownError`] — the unified error type
//! - Configuration ([`AppConfig`], config loading, verbosity validation)

pub mod config;
pub mod error;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, OutputConfig, RendererConfig, Verbosity, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{Result, SpacedownError};
