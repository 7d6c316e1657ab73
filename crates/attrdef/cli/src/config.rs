//! CLI configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! config file, then `ATTRDEFS_*` environment variables
//! (`ATTRDEFS_STORE__SCOPE=example.org`).

use attrdef_store::StoreConfig;
use serde::{Deserialize, Serialize};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ATTRDEFS";

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Store settings
    #[serde(default)]
    pub store: StoreConfig,
}

impl CliConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        Self::load_with(path, environment())
    }

    fn load_with(
        path: Option<&str>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&CliConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(environment);

        builder.build()?.try_deserialize()
    }
}

/// `ATTRDEFS_` followed by `__`-separated nested keys
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
