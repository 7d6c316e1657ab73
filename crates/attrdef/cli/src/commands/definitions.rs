//! Inspecting definition files

use super::Session;
use crate::error::{CliError, CliResult};
use crate::output::{self, print_success, DefinitionRow};
use attrdef_store::loader::{self, DecodedDefinitions};
use attrdef_store::{encode, AttributeDefinitionStore, DefinitionDecoder, FileResource};

/// Strictly load the definitions file, failing on the first problem.
pub fn load_strict(session: &Session) -> CliResult<DecodedDefinitions> {
    let resource = FileResource::new(session.definitions_path()?);
    let definitions = loader::read_definitions(&resource, &DefinitionDecoder::with_defaults())?;
    Ok(definitions)
}

/// Report whether the definitions file loads cleanly
pub fn validate(session: &Session) -> CliResult<()> {
    let definitions = load_strict(session)?;
    print_success(&format!(
        "{} attribute definition(s) are valid",
        definitions.len()
    ));
    Ok(())
}

/// Rows for every definition of `store`, under its registry key
pub fn rows_of(store: &AttributeDefinitionStore) -> Vec<DefinitionRow> {
    store
        .keys()
        .into_iter()
        .filter_map(|key| {
            store
                .locate(&key)
                .map(|definition| DefinitionRow::new(&key, definition.as_ref()))
        })
        .collect()
}

/// Rows for every definition in key order
pub fn rows(session: &Session) -> CliResult<Vec<DefinitionRow>> {
    Ok(rows_of(&session.open_store(false)?))
}

/// List key, name and type of every definition
pub fn list(session: &Session) -> CliResult<()> {
    output::print_output(rows(session)?, session.output)
}

/// Encoded form of one definition, as it would be written to disk
pub fn describe(session: &Session, key: &str) -> CliResult<serde_json::Value> {
    let store = session.open_store(false)?;
    let definition = store
        .locate(key)
        .ok_or_else(|| CliError::NotFound(format!("attribute definition [{}]", key)))?;
    Ok(encode(definition.as_ref())?)
}

/// Print one definition
pub fn show(session: &Session, key: &str) -> CliResult<()> {
    output::print_single(&describe(session, key)?, session.output)
}
