//! Lock-guarded key -> definition map

use attrdef_types::AttributeDefinition;
use parking_lot::RwLock;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

type Definitions = BTreeMap<String, Arc<dyn AttributeDefinition>>;

/// Unicode-aware case-insensitive comparison
pub(crate) fn equals_ignore_case(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

/// Key-ordered registry shared by the store and its watcher.
///
/// Every read and write goes through one lock, so a batch insert is never
/// observed half-applied.
#[derive(Default)]
pub(crate) struct Registry {
    definitions: RwLock<Definitions>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key a definition is stored under: its own non-blank key wins over a
    /// differing registering key.
    pub fn effective_key(key: &str, definition: &dyn AttributeDefinition) -> String {
        let declared = definition.key();
        if !declared.trim().is_empty() && !equals_ignore_case(declared, key) {
            tracing::warn!(
                "Attribute definition contains a key property [{}] that differs from its registering key [{}]. \
                 The key property [{}] is used to register the attribute definition",
                declared,
                key,
                declared
            );
            return declared.to_string();
        }
        key.to_string()
    }

    /// Insert if absent. Returns whether the definition was added.
    pub fn insert(&self, key: &str, definition: Arc<dyn AttributeDefinition>) -> bool {
        let mut guard = self.definitions.write();
        Self::insert_locked(&mut guard, key, definition)
    }

    /// Insert-if-absent for a whole batch under one write guard.
    /// Returns how many definitions were added.
    pub fn insert_all<I>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (String, Arc<dyn AttributeDefinition>)>,
    {
        let mut guard = self.definitions.write();
        let mut added = 0;
        for (key, definition) in entries {
            if Self::insert_locked(&mut guard, &key, definition) {
                added += 1;
            }
        }
        added
    }

    fn insert_locked(
        definitions: &mut Definitions,
        key: &str,
        definition: Arc<dyn AttributeDefinition>,
    ) -> bool {
        tracing::trace!("Registering attribute definition [{:?}] by key [{}]", definition, key);
        let key = Self::effective_key(key, definition.as_ref());
        match definitions.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(definition);
                true
            }
            Entry::Occupied(entry) => {
                tracing::trace!(
                    "Attribute definition key [{}] is already registered; keeping the existing definition",
                    entry.key()
                );
                false
            }
        }
    }

    pub fn remove(&self, key: &str) -> Option<Arc<dyn AttributeDefinition>> {
        self.definitions.write().remove(key)
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn AttributeDefinition>> {
        self.definitions.read().get(key).cloned()
    }

    /// First definition in key order matching the predicate
    pub fn find<P>(&self, predicate: P) -> Option<Arc<dyn AttributeDefinition>>
    where
        P: Fn(&dyn AttributeDefinition) -> bool,
    {
        self.definitions
            .read()
            .values()
            .find(|definition| predicate(definition.as_ref()))
            .cloned()
    }

    pub fn values(&self) -> Vec<Arc<dyn AttributeDefinition>> {
        self.definitions.read().values().cloned().collect()
    }

    pub fn keys(&self) -> Vec<String> {
        self.definitions.read().keys().cloned().collect()
    }

    /// Consistent copy of the whole map
    pub fn snapshot(&self) -> Definitions {
        self.definitions.read().clone()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.definitions.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.definitions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrdef_types::DefaultAttributeDefinition;

    fn definition(key: &str, name: &str) -> Arc<dyn AttributeDefinition> {
        Arc::new(DefaultAttributeDefinition::new(key).with_name(name))
    }

    #[test]
    fn test_insert_keeps_first_definition() {
        let registry = Registry::new();
        assert!(registry.insert("mail", definition("mail", "first")));
        assert!(!registry.insert("mail", definition("mail", "second")));

        assert_eq!(registry.get("mail").unwrap().name(), Some("first"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_declared_key_overrides_registering_key() {
        let registry = Registry::new();
        registry.insert("A", definition("B", "b"));

        assert!(registry.get("A").is_none());
        assert!(registry.get("B").is_some());
    }

    #[test]
    fn test_case_only_difference_keeps_registering_key() {
        let registry = Registry::new();
        registry.insert("MAIL", definition("mail", "m"));

        assert!(registry.contains_key("MAIL"));
        assert!(!registry.contains_key("mail"));
    }

    #[test]
    fn test_blank_declared_key_uses_registering_key() {
        let registry = Registry::new();
        registry.insert("cn", definition("", "c"));
        assert!(registry.contains_key("cn"));
    }

    #[test]
    fn test_insert_all_counts_new_keys() {
        let registry = Registry::new();
        registry.insert("cn", definition("cn", "existing"));

        let added = registry.insert_all(vec![
            ("cn".to_string(), definition("cn", "replacement")),
            ("sn".to_string(), definition("sn", "surname")),
        ]);

        assert_eq!(added, 1);
        assert_eq!(registry.get("cn").unwrap().name(), Some("existing"));
        assert_eq!(registry.keys(), vec!["cn".to_string(), "sn".to_string()]);
    }
}
