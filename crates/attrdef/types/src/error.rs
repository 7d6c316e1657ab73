//! Resolution error types

use thiserror::Error;

/// Failure raised while a definition computes attribute values.
///
/// Resolution errors always reach the caller; they are never logged and
/// dropped the way bad definition files are.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("invalid pattern format for attribute definition [{key}]: {pattern}")]
    InvalidPattern { key: String, pattern: String },

    #[error("attribute definition [{key}] failed to resolve values: {reason}")]
    Failed { key: String, reason: String },
}

/// Result type for value resolution
pub type ResolutionResult<T> = Result<T, ResolutionError>;
