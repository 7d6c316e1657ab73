use thiserror::Error;

/// Result type for loading definitions.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for persisting definitions.
pub type PersistResult<T> = Result<T, PersistError>;

/// Failure to read or decode a definitions resource.
///
/// The store logs these and keeps its previous state.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed definitions in {resource}: {message}")]
    Syntax { resource: String, message: String },

    #[error("definitions in {resource} must be an object keyed by attribute name")]
    NotAnObject { resource: String },

    #[error("attribute definition [{key}] has no string {field} discriminator")]
    MissingType { key: String, field: &'static str },

    #[error("attribute definition [{key}] has unknown type [{type_tag}]")]
    UnknownType { key: String, type_tag: String },

    #[error("attribute definition [{key}] could not be decoded: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to write the registry to a resource.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize attribute definition [{key}]: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },
}
