//! attrdefs - Command-line interface for attribute definition files
//!
//! Operators use this CLI to:
//! - Validate a definitions file before deploying it
//! - List and inspect registered definitions
//! - Try out value resolution for a principal
//! - Export, merge and watch definitions files

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use crate::commands::{definitions, persist, resolve, watch, Session};
use crate::config::CliConfig;
use crate::error::CliResult;

/// attrdefs CLI application
#[derive(Parser)]
#[command(name = "attrdefs")]
#[command(about = "Inspect, validate and merge attribute definition files", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ATTRDEFS_CONFIG")]
    config: Option<String>,

    /// Attribute definitions file, overriding store.location
    #[arg(short, long, env = "ATTRDEFS_DEFINITIONS")]
    definitions: Option<PathBuf>,

    /// Scope merged into every resolution, overriding store.scope
    #[arg(short, long)]
    scope: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Log level
    #[arg(long, env = "ATTRDEFS_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "ATTRDEFS_LOG_JSON")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Strictly load the definitions file and report problems
    Validate,

    /// List registered definitions
    #[command(alias = "ls")]
    List,

    /// Show one definition as it is persisted
    Show {
        /// Attribute definition key
        key: String,
    },

    /// Resolve attribute values through a definition
    Resolve(resolve::ResolveArgs),

    /// Write the definitions to a file as strict JSON
    Export {
        /// Output file
        path: PathBuf,
    },

    /// Add definitions from another file, keeping existing keys
    Merge {
        /// Definitions file to merge in
        other: PathBuf,

        /// Output file
        #[arg(long)]
        out: PathBuf,
    },

    /// Print the definitions whenever the file gains new keys
    Watch {
        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,
    },

    /// Show configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
            .init();
    }

    if let Err(e) = run(cli).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    // Load config, then apply command-line overrides
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(definitions) = cli.definitions {
        config.store.location = Some(definitions);
    }
    if let Some(scope) = cli.scope {
        config.store.scope = scope;
    }

    let session = Session::new(config.store.clone(), cli.output);

    match cli.command {
        Commands::Validate => definitions::validate(&session),
        Commands::List => definitions::list(&session),
        Commands::Show { key } => definitions::show(&session, &key),
        Commands::Resolve(args) => resolve::execute(&session, &args),
        Commands::Export { path } => persist::export(&session, &path).map(|_| ()),
        Commands::Merge { other, out } => persist::merge(&session, &other, &out).map(|_| ()),
        Commands::Watch { interval_ms } => {
            watch::execute(&session, Duration::from_millis(interval_ms)).await
        }
        Commands::Config => output::print_single(&config, cli.output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve_arguments() {
        let cli = Cli::try_parse_from([
            "attrdefs",
            "--definitions",
            "/etc/cas/attribute-definitions.json",
            "--scope",
            "example.org",
            "resolve",
            "eppn",
            "--value",
            "a",
            "--value",
            "b",
            "--attribute",
            "uid=casuser",
        ])
        .unwrap();

        assert_eq!(cli.scope.as_deref(), Some("example.org"));
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.key, "eppn");
                assert_eq!(args.values, vec!["a", "b"]);
                assert_eq!(args.attributes, vec![("uid".to_string(), "casuser".to_string())]);
            }
            _ => panic!("expected resolve command"),
        }
    }

    #[test]
    fn test_watch_interval_must_be_positive() {
        assert!(Cli::try_parse_from(["attrdefs", "watch", "--interval-ms", "0"]).is_err());

        let cli = Cli::try_parse_from(["attrdefs", "watch", "--interval-ms", "1"]).unwrap();
        assert!(matches!(cli.command, Commands::Watch { interval_ms: 1 }));

        let cli = Cli::try_parse_from(["attrdefs", "watch"]).unwrap();
        assert!(matches!(cli.command, Commands::Watch { interval_ms: 500 }));
    }

    #[test]
    fn test_merge_requires_output() {
        assert!(Cli::try_parse_from(["attrdefs", "merge", "other.json"]).is_err());
    }
}
