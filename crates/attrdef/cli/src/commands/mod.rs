//! CLI command implementations

pub mod definitions;
pub mod persist;
pub mod resolve;
pub mod watch;

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;
use attrdef_store::{AttributeDefinitionStore, FileResource, Resource, StoreConfig};
use std::path::Path;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct Session {
    pub store: StoreConfig,
    pub output: OutputFormat,
}

impl Session {
    pub fn new(store: StoreConfig, output: OutputFormat) -> Self {
        Self { store, output }
    }

    /// Configured definitions file
    pub fn definitions_path(&self) -> CliResult<&Path> {
        self.store.location.as_deref().ok_or(CliError::NoDefinitions)
    }

    /// Open the configured definitions file, optionally watching it
    pub fn open_store(&self, watch: bool) -> CliResult<AttributeDefinitionStore> {
        let path = self.definitions_path()?;
        open_file_store(path, &self.store, watch)
    }
}

/// Open a store backed by `path`, failing when the file does not exist
pub fn open_file_store(
    path: &Path,
    config: &StoreConfig,
    watch: bool,
) -> CliResult<AttributeDefinitionStore> {
    let resource = FileResource::new(path);
    if !resource.exists() {
        return Err(CliError::NotFound(resource.description()));
    }

    tracing::debug!("Opening attribute definitions from {}", resource.description());
    Ok(AttributeDefinitionStore::builder()
        .scope(config.scope.clone())
        .watch(watch)
        .watch_debounce(config.watch_debounce())
        .build_from(&resource))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_without_location() {
        let session = Session::new(StoreConfig::default(), OutputFormat::Table);
        assert!(matches!(session.definitions_path(), Err(CliError::NoDefinitions)));
        assert!(matches!(session.open_store(false), Err(CliError::NoDefinitions)));
    }

    #[test]
    fn test_open_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::default().with_location(dir.path().join("absent.json"));
        let session = Session::new(config, OutputFormat::Json);

        assert!(matches!(session.open_store(false), Err(CliError::NotFound(_))));
    }

    #[test]
    fn test_open_store_applies_scope() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write(dir.path(), "defs.json", fixtures::DEFINITIONS);
        let config = StoreConfig::default()
            .with_location(&path)
            .with_scope("example.org");

        let store = Session::new(config, OutputFormat::Table).open_store(false).unwrap();
        assert_eq!(store.keys(), vec!["eppn".to_string(), "mail".to_string()]);
        assert_eq!(store.scope(), "example.org");
        assert!(!store.is_watching());
    }
}
