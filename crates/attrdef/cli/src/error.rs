//! CLI error types

use attrdef_store::{LoadError, PersistError, ResolutionError};
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// No definitions file was given on the command line or in configuration
    #[error("No definitions file configured; pass --definitions or set store.location")]
    NoDefinitions,

    /// Definitions file could not be loaded
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Definitions could not be written
    #[error("Persist error: {0}")]
    Persist(#[from] PersistError),

    /// Attribute values could not be resolved
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
