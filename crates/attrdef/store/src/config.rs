//! Store configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for an attribute definition store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Definitions file; the store starts empty when unset
    #[serde(default)]
    pub location: Option<PathBuf>,

    /// Scope merged into every resolution context
    #[serde(default)]
    pub scope: String,

    /// Reload the definitions file when it changes
    #[serde(default = "default_true")]
    pub watch: bool,

    /// Quiet period after a file change before reloading, in milliseconds
    #[serde(default = "default_watch_debounce")]
    pub watch_debounce_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            location: None,
            scope: String::new(),
            watch: true,
            watch_debounce_ms: default_watch_debounce(),
        }
    }
}

impl StoreConfig {
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn watch_debounce(&self) -> Duration {
        Duration::from_millis(self.watch_debounce_ms)
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_watch_debounce() -> u64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert!(config.location.is_none());
        assert!(config.scope.is_empty());
        assert!(config.watch);
        assert_eq!(config.watch_debounce(), Duration::from_millis(50));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"location": "/etc/cas/attribute-definitions.json"}"#).unwrap();
        assert_eq!(
            config.location,
            Some(PathBuf::from("/etc/cas/attribute-definitions.json"))
        );
        assert!(config.watch);
        assert_eq!(config.watch_debounce_ms, 50);
    }
}
