//! Attribute definition store
//!
//! The store owns the registry and, for file-backed stores, the watcher that
//! reloads it. All access goes through the store; lookups hand out shared
//! definitions or snapshots, never the map itself.

use crate::config::StoreConfig;
use crate::decoder::DefinitionDecoder;
use crate::error::{PersistError, PersistResult};
use crate::loader;
use crate::registry::{equals_ignore_case, Registry};
use crate::resource::{FileResource, Resource, WritableResource};
use crate::watcher::{DefinitionWatcher, DEFAULT_DEBOUNCE};
use attrdef_types::{downcast_arc, AttributeDefinition, ResolutionContext, ResolutionResult};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// A definition together with the values it resolved
#[derive(Debug, Clone)]
pub struct ResolvedAttribute {
    pub definition: Arc<dyn AttributeDefinition>,
    pub values: Vec<String>,
}

/// Registry of attribute definitions keyed by attribute key
pub struct AttributeDefinitionStore {
    registry: Arc<Registry>,
    decoder: Arc<DefinitionDecoder>,
    scope: RwLock<String>,
    watcher: Mutex<Option<DefinitionWatcher>>,
}

impl AttributeDefinitionStore {
    /// Empty store using the built-in definition variants
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// Store pre-populated with the given definitions, each under its own key
    pub fn with_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn AttributeDefinition>>,
    {
        let store = Self::new();
        for definition in definitions {
            store.register(definition);
        }
        store
    }

    /// Load definitions from a resource, watching it when it is a file.
    ///
    /// Never fails: an unreadable or malformed resource yields an empty store.
    pub fn from_resource(resource: &dyn Resource) -> Self {
        Self::builder().build_from(resource)
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        let builder = Self::builder()
            .scope(config.scope.clone())
            .watch(config.watch)
            .watch_debounce(config.watch_debounce());
        match &config.location {
            Some(location) => builder.build_from(&FileResource::new(location)),
            None => builder.build(),
        }
    }

    pub fn scope(&self) -> String {
        self.scope.read().clone()
    }

    pub fn set_scope(&self, scope: impl Into<String>) {
        *self.scope.write() = scope.into();
    }

    /// Register a definition under its own key, unless the key is taken.
    pub fn register(&self, definition: Arc<dyn AttributeDefinition>) -> &Self {
        let key = definition.key().to_string();
        self.register_with_key(&key, definition)
    }

    /// Register a definition under `key`, unless the key is taken.
    ///
    /// A non-blank key declared by the definition itself takes precedence
    /// over a differing `key`.
    pub fn register_with_key(&self, key: &str, definition: Arc<dyn AttributeDefinition>) -> &Self {
        self.registry.insert(key, definition);
        self
    }

    /// Remove the definition registered under `key`, if any.
    pub fn remove(&self, key: &str) -> &Self {
        tracing::debug!("Removing attribute definition by key [{}]", key);
        match self.registry.remove(key) {
            Some(definition) => tracing::debug!(
                "Attribute definition [{:?}] has been removed from the definition store",
                definition
            ),
            None => tracing::debug!(
                "Attribute definition with the registered key [{}] was not found and the store was not altered",
                key
            ),
        }
        self
    }

    pub fn locate(&self, key: &str) -> Option<Arc<dyn AttributeDefinition>> {
        tracing::trace!("Locating attribute definition for [{}]", key);
        self.registry.get(key)
    }

    /// Locate by key, only if the definition is of variant `T`.
    pub fn locate_as<T: AttributeDefinition>(&self, key: &str) -> Option<Arc<T>> {
        self.locate(key).and_then(downcast_arc::<T>)
    }

    /// First definition in key order whose non-blank name matches, ignoring case.
    pub fn locate_by_name(&self, name: &str) -> Option<Arc<dyn AttributeDefinition>> {
        self.registry.find(|definition| {
            definition.has_name()
                && definition
                    .name()
                    .is_some_and(|candidate| equals_ignore_case(candidate, name))
        })
    }

    /// First definition in key order satisfying the predicate.
    pub fn locate_by<P>(&self, predicate: P) -> Option<Arc<dyn AttributeDefinition>>
    where
        P: Fn(&dyn AttributeDefinition) -> bool,
    {
        self.registry.find(predicate)
    }

    /// Snapshot of all definitions in key order
    pub fn definitions(&self) -> Vec<Arc<dyn AttributeDefinition>> {
        self.registry.values()
    }

    /// Lazily filtered snapshot of the definitions of variant `T`
    pub fn definitions_of<T: AttributeDefinition>(&self) -> impl Iterator<Item = Arc<T>> {
        self.registry.values().into_iter().filter_map(downcast_arc::<T>)
    }

    pub fn keys(&self) -> Vec<String> {
        self.registry.keys()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.registry.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Resolve values through the definition registered under `key`.
    ///
    /// The store scope replaces the scope of `context`. Returns `Ok(None)`
    /// when no definition is registered; resolution failures are returned.
    pub fn resolve_attribute_values(
        &self,
        key: &str,
        context: ResolutionContext,
    ) -> ResolutionResult<Option<ResolvedAttribute>> {
        let Some(definition) = self.locate(key) else {
            return Ok(None);
        };
        let context = context.with_scope(self.scope());
        let values = definition.resolve_attribute_values(&context)?;
        Ok(Some(ResolvedAttribute { definition, values }))
    }

    /// Write every definition to `resource` as pretty-printed JSON,
    /// replacing its content.
    pub fn store(&self, resource: &dyn WritableResource) -> PersistResult<&Self> {
        let json = loader::write_definitions(&self.registry.snapshot())?;
        let description = resource.description();
        tracing::trace!("Storing attribute definitions as [{}] to {}", json, description);
        resource
            .write_string(&json)
            .map_err(|source| PersistError::Io {
                resource: description,
                source,
            })?;
        Ok(self)
    }

    /// Copy every definition of `other` into this store, keeping existing keys.
    ///
    /// Definitions are imported under the keys `other` registered them with,
    /// not re-registered by each definition's own `key`, so definitions
    /// without a declared key keep their registry key.
    pub fn import_store(&self, other: &AttributeDefinitionStore) -> &Self {
        let entries = other.registry.snapshot();
        let added = self.registry.insert_all(entries);
        tracing::debug!("Imported {} attribute definition(s) from another store", added);
        self
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.lock().is_some()
    }

    /// Stop the file watcher, if any, and wait for it to exit.
    ///
    /// Safe to call repeatedly; no reload runs after this returns.
    pub fn close(&self) {
        if let Some(mut watcher) = self.watcher.lock().take() {
            watcher.stop();
        }
    }

    fn start_watching(&self, path: &Path, debounce: Duration) {
        let registry = self.registry.clone();
        let decoder = self.decoder.clone();
        let file = FileResource::new(path);
        let reload = move || {
            load_into(&registry, &file, &decoder);
        };

        match DefinitionWatcher::start(path, debounce, reload) {
            Ok(watcher) => *self.watcher.lock() = Some(watcher),
            Err(e) => tracing::warn!(
                "Attribute definitions in {} will not be reloaded on change: {}",
                path.display(),
                e
            ),
        }
    }
}

impl Default for AttributeDefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AttributeDefinitionStore {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for AttributeDefinitionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDefinitionStore")
            .field("keys", &self.keys())
            .field("scope", &self.scope())
            .field("watching", &self.is_watching())
            .finish()
    }
}

/// Builder for [`AttributeDefinitionStore`]
pub struct StoreBuilder {
    decoder: DefinitionDecoder,
    scope: String,
    watch: bool,
    watch_debounce: Duration,
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self {
            decoder: DefinitionDecoder::with_defaults(),
            scope: String::new(),
            watch: true,
            watch_debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl StoreBuilder {
    /// Decoder used for the initial load and every reload
    pub fn decoder(mut self, decoder: DefinitionDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Whether file resources are watched for changes
    pub fn watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn watch_debounce(mut self, debounce: Duration) -> Self {
        self.watch_debounce = debounce;
        self
    }

    /// Build an empty store
    pub fn build(self) -> AttributeDefinitionStore {
        AttributeDefinitionStore {
            registry: Arc::new(Registry::new()),
            decoder: Arc::new(self.decoder),
            scope: RwLock::new(self.scope),
            watcher: Mutex::new(None),
        }
    }

    /// Build a store loaded from `resource`.
    ///
    /// A missing resource gives an empty, unwatched store.
    pub fn build_from(self, resource: &dyn Resource) -> AttributeDefinitionStore {
        let watch = self.watch;
        let debounce = self.watch_debounce;
        let store = self.build();

        if !resource.exists() {
            tracing::debug!(
                "{} does not exist; starting with an empty attribute definition store",
                resource.description()
            );
            return store;
        }

        load_into(&store.registry, resource, &store.decoder);
        if watch {
            if let Some(path) = resource.file_path() {
                store.start_watching(path, debounce);
            }
        }
        store
    }
}

/// Load a resource into the registry, logging and dropping any failure.
fn load_into(registry: &Registry, resource: &dyn Resource, decoder: &DefinitionDecoder) {
    match loader::read_definitions(resource, decoder) {
        Ok(definitions) => {
            let added = registry.insert_all(definitions);
            tracing::trace!("Registered {} new attribute definition(s)", added);
        }
        Err(e) => tracing::warn!(
            "Failed to load attribute definitions from {}: {}",
            resource.description(),
            e
        ),
    }
    tracing::debug!("Loaded [{}] attribute definition(s).", registry.len());
}
