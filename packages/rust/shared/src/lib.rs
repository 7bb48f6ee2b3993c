//! Shared types, error model, and configuration for pipedoc.
//!
//! This crate is the foundation depended on by all other pipedoc crates.
//! It provides:
//! - [`PipedocError`], the unified error type
//! - Domain types ([`Section`], [`CodeFragment`], [`ConfigNode`], [`CompileIssue`])
//! - Configuration ([`AppConfig`], [`CompileOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CompileConfig, CompileOptions, OutputConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{MetadataDecodeError, PipedocError, Result};
pub use types::{
    Artifact, CodeFragment, CompileIssue, ConfigNode, MAX_SECTION_DEPTH, METADATA_KEY,
    MetadataFormat, ORDER_KEY, Section,
};
