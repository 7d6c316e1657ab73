//! Discriminator-keyed definition decoder
//!
//! Each definition object carries its variant in the [`CLASS_FIELD`] field.
//! The decoder maps that value to a constructor. Dotted names such as
//! `org.example.DefaultAttributeDefinition` fall back to their last segment,
//! so files written by class-name based serializers decode too.

use crate::error::{LoadError, LoadResult};
use attrdef_types::{
    AttributeDefinition, DefaultAttributeDefinition, OidcAttributeDefinition,
    SamlAttributeDefinition,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Field holding the variant discriminator.
pub const CLASS_FIELD: &str = "@class";

type DecodeFn =
    Arc<dyn Fn(Value) -> serde_json::Result<Arc<dyn AttributeDefinition>> + Send + Sync>;

/// Maps discriminators to definition constructors.
#[derive(Clone, Default)]
pub struct DefinitionDecoder {
    constructors: HashMap<String, DecodeFn>,
}

impl DefinitionDecoder {
    /// Decoder with no variants registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder knowing the built-in variants
    pub fn with_defaults() -> Self {
        let mut decoder = Self::new();
        decoder
            .register::<DefaultAttributeDefinition>(DefaultAttributeDefinition::TYPE_TAG)
            .register::<SamlAttributeDefinition>(SamlAttributeDefinition::TYPE_TAG)
            .register::<OidcAttributeDefinition>(OidcAttributeDefinition::TYPE_TAG);
        decoder
    }

    /// Register a serde-decodable variant under a discriminator.
    ///
    /// A later registration for the same discriminator replaces the earlier one.
    pub fn register<T>(&mut self, type_tag: impl Into<String>) -> &mut Self
    where
        T: AttributeDefinition + DeserializeOwned,
    {
        self.register_fn(type_tag, |value| {
            let definition: T = serde_json::from_value(value)?;
            Ok(Arc::new(definition) as Arc<dyn AttributeDefinition>)
        })
    }

    /// Register a custom constructor under a discriminator.
    pub fn register_fn<F>(&mut self, type_tag: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(Value) -> serde_json::Result<Arc<dyn AttributeDefinition>> + Send + Sync + 'static,
    {
        self.constructors.insert(type_tag.into(), Arc::new(constructor));
        self
    }

    pub fn supports(&self, type_tag: &str) -> bool {
        self.constructor(type_tag).is_some()
    }

    /// Registered discriminators, sorted
    pub fn type_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    fn constructor(&self, type_tag: &str) -> Option<&DecodeFn> {
        self.constructors.get(type_tag).or_else(|| {
            type_tag
                .rsplit_once('.')
                .and_then(|(_, simple)| self.constructors.get(simple))
        })
    }

    /// Decode one definition object.
    pub fn decode(&self, key: &str, value: Value) -> LoadResult<Arc<dyn AttributeDefinition>> {
        let Value::Object(mut fields) = value else {
            return Err(LoadError::MissingType {
                key: key.to_string(),
                field: CLASS_FIELD,
            });
        };

        let type_tag = match fields.remove(CLASS_FIELD) {
            Some(Value::String(tag)) => tag,
            _ => {
                return Err(LoadError::MissingType {
                    key: key.to_string(),
                    field: CLASS_FIELD,
                })
            }
        };

        let constructor = self
            .constructor(&type_tag)
            .ok_or_else(|| LoadError::UnknownType {
                key: key.to_string(),
                type_tag: type_tag.clone(),
            })?;

        (**constructor)(Value::Object(fields)).map_err(|source| LoadError::Decode {
            key: key.to_string(),
            source,
        })
    }

    /// Decode a whole `key -> definition` document.
    ///
    /// All-or-nothing: the first bad entry fails the document.
    pub fn decode_document(
        &self,
        resource: &str,
        document: Value,
    ) -> LoadResult<BTreeMap<String, Arc<dyn AttributeDefinition>>> {
        let Value::Object(entries) = document else {
            return Err(LoadError::NotAnObject {
                resource: resource.to_string(),
            });
        };

        entries
            .into_iter()
            .map(|(key, value)| {
                let definition = self.decode(&key, value)?;
                Ok((key, definition))
            })
            .collect()
    }
}

impl fmt::Debug for DefinitionDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionDecoder")
            .field("type_tags", &self.type_tags())
            .finish()
    }
}

/// Encode a definition with its discriminator.
pub fn encode(definition: &dyn AttributeDefinition) -> serde_json::Result<Value> {
    let mut object = Map::new();
    object.insert(
        CLASS_FIELD.to_string(),
        Value::String(definition.type_tag().to_string()),
    );
    match definition.to_json()? {
        Value::Object(fields) => object.extend(fields),
        other => {
            object.insert("value".to_string(), other);
        }
    }
    Ok(Value::Object(object))
}
