// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Only startup problems surface as [`BuilderatorError`]. A build that fails
//! (or never starts) is a [`crate::types::BuildResult`], not an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuilderatorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("no config file ({name}) found")]
    ConfigNotFound { name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BuilderatorError>;
