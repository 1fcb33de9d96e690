// src/config/mod.rs

//! Configuration loading and validation for builderator.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Discover and load a config file from disk (`loader.rs`).
//! - Resolve every path to an absolute one (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    find_config, generate_starter, load_and_validate, load_from_path, resolve_config_path,
    CONFIG_FILE_NAME, DISCOVERY_DEPTH, STARTER_CONFIG,
};
pub use model::{Config, RawConfig, DEFAULT_STAND_IN};
pub use validate::{clean_path, reroot_path};
