//! Resolution context passed to attribute definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-query inputs for attribute value resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionContext {
    /// Scope applied by scoped definitions (usually set by the store)
    #[serde(default)]
    pub scope: String,

    /// Principal identifier
    #[serde(default)]
    pub principal: String,

    /// Name of the attribute being released
    #[serde(default)]
    pub attribute_name: String,

    /// Current values of the attribute being released
    #[serde(default)]
    pub attribute_values: Vec<String>,

    /// All attributes known for the principal
    #[serde(default)]
    pub principal_attributes: BTreeMap<String, Vec<String>>,

    /// Service the attributes are released to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl ResolutionContext {
    pub fn new(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            ..Default::default()
        }
    }

    /// Return the same context carrying the given scope.
    pub fn with_scope(self, scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..self
        }
    }

    pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_name = name.into();
        self
    }

    pub fn with_attribute_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attribute_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_principal_attribute<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.principal_attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Values of a principal attribute, empty when the principal lacks it.
    pub fn principal_attribute(&self, name: &str) -> &[String] {
        self.principal_attributes
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_scope_keeps_caller_fields() {
        let context = ResolutionContext::new("casuser")
            .with_attribute_name("mail")
            .with_attribute_values(["casuser"])
            .with_service("https://app.example.org")
            .with_scope("example.org");

        assert_eq!(context.scope, "example.org");
        assert_eq!(context.principal, "casuser");
        assert_eq!(context.attribute_name, "mail");
        assert_eq!(context.attribute_values, vec!["casuser".to_string()]);
        assert_eq!(context.service.as_deref(), Some("https://app.example.org"));
    }

    #[test]
    fn test_with_scope_replaces_previous_scope() {
        let context = ResolutionContext::new("casuser")
            .with_scope("old.example.org")
            .with_scope("example.org");
        assert_eq!(context.scope, "example.org");
    }

    #[test]
    fn test_missing_principal_attribute_is_empty() {
        let context = ResolutionContext::new("casuser").with_principal_attribute("uid", ["u1"]);
        assert_eq!(context.principal_attribute("uid"), ["u1".to_string()]);
        assert!(context.principal_attribute("cn").is_empty());
    }
}
