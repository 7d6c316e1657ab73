//! Resolving attribute values

use super::Session;
use crate::error::{CliError, CliResult};
use crate::output;
use attrdef_store::ResolutionContext;
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

/// Arguments for `attrdefs resolve`
#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Attribute definition key
    pub key: String,

    /// Current attribute value (repeatable)
    #[arg(long = "value")]
    pub values: Vec<String>,

    /// Authenticated principal id
    #[arg(short, long, default_value = "")]
    pub principal: String,

    /// Principal attribute as name=value (repeatable)
    #[arg(short, long = "attribute", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,

    /// Service the attribute is released to
    #[arg(long)]
    pub service: Option<String>,
}

impl ResolveArgs {
    /// Resolution context described by the arguments
    pub fn context(&self) -> ResolutionContext {
        let mut context = ResolutionContext::new(self.principal.clone())
            .with_attribute_name(self.key.clone())
            .with_attribute_values(self.values.iter().cloned());
        let mut attributes: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, value) in &self.attributes {
            attributes.entry(name.as_str()).or_default().push(value.as_str());
        }
        for (name, values) in attributes {
            context = context.with_principal_attribute(name, values);
        }
        if let Some(service) = &self.service {
            context = context.with_service(service.clone());
        }
        context
    }
}

/// Parse `name=value`
pub fn parse_attribute(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got [{}]", input)),
    }
}

/// Table row for a resolved value
#[derive(Debug, Serialize, Tabled)]
pub struct ValueRow {
    pub key: String,
    pub value: String,
}

/// Resolve values through the definition registered under `args.key`
pub fn resolve_values(session: &Session, args: &ResolveArgs) -> CliResult<Vec<String>> {
    let store = session.open_store(false)?;
    let resolved = store
        .resolve_attribute_values(&args.key, args.context())?
        .ok_or_else(|| CliError::NotFound(format!("attribute definition [{}]", args.key)))?;
    tracing::debug!(
        "Resolved {} value(s) through {:?}",
        resolved.values.len(),
        resolved.definition
    );
    Ok(resolved.values)
}

/// Print the resolved values
pub fn execute(session: &Session, args: &ResolveArgs) -> CliResult<()> {
    let rows = resolve_values(session, args)?
        .into_iter()
        .map(|value| ValueRow {
            key: args.key.clone(),
            value,
        })
        .collect();
    output::print_output(rows, session.output)
}
