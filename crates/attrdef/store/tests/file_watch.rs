//! File-backed store behavior: initial load, reload on change, persistence.

use attrdef_store::{AttributeDefinitionStore, FileResource, StoreConfig};
use attrdef_types::{AttributeDefinition, DefaultAttributeDefinition};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

const INITIAL: &str = r#"{
    // initial definitions
    mail: {
        "@class": "DefaultAttributeDefinition",
        key: "mail",
        name: "email",
    },
}"#;

const WITH_NEW_KEY: &str = r#"{
    mail: {
        "@class": "DefaultAttributeDefinition",
        key: "mail",
        name: "changed",
    },
    cn: {
        "@class": "DefaultAttributeDefinition",
        key: "cn",
        name: "commonName",
    },
}"#;

fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    condition()
}

fn write(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

#[test]
fn new_keys_are_picked_up_but_existing_keys_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attribute-definitions.json");
    write(&path, INITIAL);

    let store = AttributeDefinitionStore::from_resource(&FileResource::new(&path));
    assert!(store.is_watching());
    assert_eq!(store.keys(), vec!["mail".to_string()]);

    write(&path, WITH_NEW_KEY);
    assert!(
        wait_until(Duration::from_secs(10), || store.contains_key("cn")),
        "new key was not loaded after the file changed"
    );

    assert_eq!(store.locate("mail").unwrap().name(), Some("email"));
    assert_eq!(store.locate("cn").unwrap().name(), Some("commonName"));
    store.close();
}

fn document_with_keys(keys: &[String]) -> String {
    let entries: Vec<String> = keys
        .iter()
        .map(|key| {
            format!(
                r#"  "{key}": {{ "@class": "DefaultAttributeDefinition", key: "{key}" }}"#,
                key = key
            )
        })
        .collect();
    format!("{{\n{}\n}}", entries.join(",\n"))
}

#[test]
fn readers_never_observe_a_partial_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attribute-definitions.json");
    write(&path, INITIAL);

    let store = AttributeDefinitionStore::from_resource(&FileResource::new(&path));
    assert!(store.is_watching());

    let mut all_keys = vec!["mail".to_string()];
    all_keys.extend((0..500).map(|i| format!("attr{:03}", i)));
    let old: BTreeSet<String> = ["mail".to_string()].into_iter().collect();
    let full: BTreeSet<String> = all_keys.iter().cloned().collect();

    let (partial_sizes, saw_full) = std::thread::scope(|scope| {
        let reader = scope.spawn(|| {
            let mut partial_sizes = Vec::new();
            let deadline = Instant::now() + Duration::from_secs(10);
            while Instant::now() < deadline {
                let keys: BTreeSet<String> = store
                    .definitions()
                    .iter()
                    .map(|definition| definition.key().to_string())
                    .collect();
                if keys == full {
                    return (partial_sizes, true);
                }
                if keys != old {
                    partial_sizes.push(keys.len());
                }
            }
            (partial_sizes, false)
        });

        write(&path, &document_with_keys(&all_keys));
        reader.join().unwrap()
    });

    assert!(saw_full, "reload was never observed");
    assert!(
        partial_sizes.is_empty(),
        "observed partial reloads with key counts {:?}",
        partial_sizes
    );
}

#[test]
fn malformed_rewrite_keeps_previous_definitions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attribute-definitions.json");
    write(&path, INITIAL);

    let store = AttributeDefinitionStore::from_resource(&FileResource::new(&path));
    write(&path, r#"{ "cn": { "@class": "#);
    std::thread::sleep(Duration::from_millis(300));

    assert_eq!(store.keys(), vec!["mail".to_string()]);

    write(&path, WITH_NEW_KEY);
    assert!(wait_until(Duration::from_secs(10), || store.contains_key("cn")));
}

#[test]
fn no_reload_after_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attribute-definitions.json");
    write(&path, INITIAL);

    let store = AttributeDefinitionStore::from_resource(&FileResource::new(&path));
    store.close();
    store.close();
    assert!(!store.is_watching());

    write(&path, WITH_NEW_KEY);
    std::thread::sleep(Duration::from_millis(300));
    assert!(!store.contains_key("cn"));
}

#[test]
fn unwatched_config_loads_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attribute-definitions.json");
    write(&path, INITIAL);

    let config = StoreConfig::default()
        .with_location(&path)
        .with_scope("example.org")
        .with_watch(false);
    let store = AttributeDefinitionStore::from_config(&config);

    assert!(!store.is_watching());
    assert!(store.contains_key("mail"));
    assert_eq!(store.scope(), "example.org");
}

#[test]
fn store_to_file_and_load_fresh_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exported.json");

    let store = AttributeDefinitionStore::with_definitions([
        Arc::new(DefaultAttributeDefinition::new("mail").with_name("email"))
            as Arc<dyn AttributeDefinition>,
        Arc::new(
            DefaultAttributeDefinition::new("eppn")
                .with_attribute("uid")
                .with_scoped(true),
        ),
    ]);
    store.store(&FileResource::new(&path)).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let strict: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(strict["eppn"]["@class"], "DefaultAttributeDefinition");

    let fresh = AttributeDefinitionStore::builder()
        .watch(false)
        .build_from(&FileResource::new(&path));
    assert_eq!(fresh.keys(), store.keys());
    let eppn = fresh
        .locate_as::<DefaultAttributeDefinition>("eppn")
        .unwrap();
    assert!(eppn.scoped);
    assert_eq!(eppn.attribute.as_deref(), Some("uid"));
}
