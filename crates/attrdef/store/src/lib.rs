//! Attribute Definition Store
//!
//! The store owns the authoritative mapping from attribute key to attribute
//! definition:
//!
//! - **Loading**: Definitions are read from a relaxed JSON resource and decoded
//!   through a discriminator-keyed [`DefinitionDecoder`]
//! - **Watching**: File-backed stores reload when the file changes on disk
//! - **Lookups**: By key, name, variant type or arbitrary predicate
//! - **Persistence**: The whole registry can be written back as strict JSON
//!
//! ## Merge policy
//!
//! Registration is insert-if-absent everywhere, including reloads. Once a key
//! is present, later registrations under that key are ignored; only new keys
//! take effect after the first load.
//!
//! ## Errors
//!
//! A bad definitions file is logged and ignored ([`LoadError`] never reaches
//! store callers). Persisting ([`PersistError`]) and resolving values
//! ([`ResolutionError`]) report failures to the caller.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod decoder;
mod error;
pub mod loader;
mod registry;
pub mod resource;
pub mod store;
mod watcher;

// Re-exports
pub use attrdef_types::{AttributeDefinition, ResolutionContext, ResolutionError};
pub use config::StoreConfig;
pub use decoder::{encode, DefinitionDecoder, CLASS_FIELD};
pub use error::{LoadError, LoadResult, PersistError, PersistResult};
pub use resource::{FileResource, InMemoryResource, Resource, WritableResource};
pub use store::{AttributeDefinitionStore, ResolvedAttribute, StoreBuilder};
