//! Output formatting

use crate::error::CliResult;
use attrdef_store::AttributeDefinition;
use colored::*;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Table row describing one registered definition
#[derive(Debug, Serialize, Tabled)]
pub struct DefinitionRow {
    pub key: String,
    pub name: String,
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    pub type_tag: String,
}

impl DefinitionRow {
    pub fn new(key: &str, definition: &dyn AttributeDefinition) -> Self {
        Self {
            key: key.to_string(),
            name: definition.name().unwrap_or_default().to_string(),
            type_tag: definition.type_tag().to_string(),
        }
    }
}

/// Render rows in the requested format
pub fn render_rows<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) -> CliResult<String> {
    Ok(match format {
        OutputFormat::Table if data.is_empty() => "No results".dimmed().to_string(),
        OutputFormat::Table => Table::new(data).to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(&data)?,
        OutputFormat::Yaml => serde_yaml::to_string(&data)?,
    })
}

/// Render a single item; tables fall back to JSON
pub fn render_single<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<String> {
    Ok(match format {
        OutputFormat::Table | OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    })
}

/// Print a vector of items in the specified format
pub fn print_output<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) -> CliResult<()> {
    println!("{}", render_rows(data, format)?);
    Ok(())
}

/// Print a single item in the specified format
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<()> {
    println!("{}", render_single(data, format)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}
