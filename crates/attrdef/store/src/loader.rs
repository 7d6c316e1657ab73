//! Reading and writing definition documents
//!
//! Input is relaxed JSON (JSON5: comments, unquoted keys, trailing commas,
//! single-quoted strings). It is normalized to strict JSON before decoding.
//! Output is always pretty-printed strict JSON in key order.

use crate::decoder::{self, DefinitionDecoder};
use crate::error::{LoadError, LoadResult, PersistError, PersistResult};
use crate::resource::Resource;
use attrdef_types::AttributeDefinition;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Definitions decoded from one document, keyed as written in the document
pub type DecodedDefinitions = BTreeMap<String, Arc<dyn AttributeDefinition>>;

/// Parse relaxed JSON text into a strict JSON value.
pub fn relax(resource: &str, text: &str) -> LoadResult<Value> {
    json5::from_str::<Value>(text).map_err(|e| LoadError::Syntax {
        resource: resource.to_string(),
        message: e.to_string(),
    })
}

/// Decode definitions from relaxed JSON text.
pub fn parse_definitions(
    resource: &str,
    text: &str,
    decoder: &DefinitionDecoder,
) -> LoadResult<DecodedDefinitions> {
    let document = relax(resource, text)?;
    decoder.decode_document(resource, document)
}

/// Read and decode every definition in a resource.
pub fn read_definitions(
    resource: &dyn Resource,
    decoder: &DefinitionDecoder,
) -> LoadResult<DecodedDefinitions> {
    let description = resource.description();
    tracing::trace!("Loading attribute definitions from {}", description);

    let text = resource.read_to_string().map_err(|source| LoadError::Io {
        resource: description.clone(),
        source,
    })?;
    tracing::trace!("Loaded attribute definitions [{}] from {}", text, description);

    parse_definitions(&description, &text, decoder)
}

/// Serialize definitions to pretty-printed strict JSON.
pub fn write_definitions<'a, I>(definitions: I) -> PersistResult<String>
where
    I: IntoIterator<Item = (&'a String, &'a Arc<dyn AttributeDefinition>)>,
{
    let mut document = Map::new();
    for (key, definition) in definitions {
        let encoded =
            decoder::encode(definition.as_ref()).map_err(|source| PersistError::Serialization {
                key: key.clone(),
                source,
            })?;
        document.insert(key.clone(), encoded);
    }

    serde_json::to_string_pretty(&Value::Object(document)).map_err(|source| {
        PersistError::Serialization {
            key: String::new(),
            source,
        }
    })
}
