//! Default attribute definition
//!
//! The general-purpose variant. Values come either from a named principal
//! attribute or from the values currently being released, and are then
//! formatted, scoped, canonicalized and optionally flattened, in that order.

use crate::context::ResolutionContext;
use crate::definition::AttributeDefinition;
use crate::error::{ResolutionError, ResolutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder replaced by each value in a pattern format.
pub const PATTERN_PLACEHOLDER: &str = "{0}";

/// Case normalization applied to resolved values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CanonicalizationMode {
    #[default]
    None,
    Upper,
    Lower,
}

impl CanonicalizationMode {
    pub fn apply(self, value: String) -> String {
        match self {
            CanonicalizationMode::None => value,
            CanonicalizationMode::Upper => value.to_uppercase(),
            CanonicalizationMode::Lower => value.to_lowercase(),
        }
    }
}

/// General-purpose attribute definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultAttributeDefinition {
    /// Registry key
    #[serde(default)]
    pub key: String,

    /// Alias used for name lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Principal attribute to read values from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,

    /// Append `@scope` to every value
    #[serde(default)]
    pub scoped: bool,

    /// Format applied to every value, e.g. `uid={0},ou=people`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_format: Option<String>,

    #[serde(default)]
    pub canonicalization_mode: CanonicalizationMode,

    /// Join multiple values into a single comma-separated value
    #[serde(default)]
    pub flattened: bool,
}

impl DefaultAttributeDefinition {
    pub const TYPE_TAG: &'static str = "DefaultAttributeDefinition";

    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_scoped(mut self, scoped: bool) -> Self {
        self.scoped = scoped;
        self
    }

    pub fn with_pattern_format(mut self, pattern: impl Into<String>) -> Self {
        self.pattern_format = Some(pattern.into());
        self
    }

    pub fn with_canonicalization_mode(mut self, mode: CanonicalizationMode) -> Self {
        self.canonicalization_mode = mode;
        self
    }

    pub fn with_flattened(mut self, flattened: bool) -> Self {
        self.flattened = flattened;
        self
    }

    /// Shared resolution pipeline, also used by the SAML and OIDC variants.
    pub fn resolve(&self, context: &ResolutionContext) -> ResolutionResult<Vec<String>> {
        let source = match self.attribute.as_deref().filter(|a| !a.trim().is_empty()) {
            Some(attribute) => context.principal_attribute(attribute).to_vec(),
            None => context.attribute_values.clone(),
        };

        let pattern = self.checked_pattern()?;
        let scope = context.scope.trim();

        let mut values: Vec<String> = source
            .into_iter()
            .map(|value| match pattern {
                Some(pattern) => pattern.replace(PATTERN_PLACEHOLDER, &value),
                None => value,
            })
            .map(|value| {
                if self.scoped && !scope.is_empty() {
                    format!("{value}@{scope}")
                } else {
                    value
                }
            })
            .map(|value| self.canonicalization_mode.apply(value))
            .collect();

        if self.flattened && values.len() > 1 {
            values = vec![values.join(",")];
        }

        tracing::trace!(
            "Resolved {} value(s) for attribute definition [{}]",
            values.len(),
            self.key
        );
        Ok(values)
    }

    fn checked_pattern(&self) -> ResolutionResult<Option<&str>> {
        match self.pattern_format.as_deref() {
            Some(pattern) if pattern.trim().is_empty() => Ok(None),
            Some(pattern) if !pattern.contains(PATTERN_PLACEHOLDER) => {
                Err(ResolutionError::InvalidPattern {
                    key: self.key.clone(),
                    pattern: pattern.to_string(),
                })
            }
            other => Ok(other),
        }
    }
}

impl AttributeDefinition for DefaultAttributeDefinition {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn resolve_attribute_values(
        &self,
        context: &ResolutionContext,
    ) -> ResolutionResult<Vec<String>> {
        self.resolve(context)
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ResolutionContext {
        ResolutionContext::new("casuser")
            .with_attribute_name("mail")
            .with_attribute_values(["casuser", "cas"])
            .with_principal_attribute("uid", ["u-1"])
    }

    #[test]
    fn test_passes_current_values_through() {
        let definition = DefaultAttributeDefinition::new("mail");
        let values = definition.resolve(&context()).unwrap();
        assert_eq!(values, vec!["casuser", "cas"]);
    }

    #[test]
    fn test_reads_source_attribute() {
        let definition = DefaultAttributeDefinition::new("eppn").with_attribute("uid");
        let values = definition.resolve(&context()).unwrap();
        assert_eq!(values, vec!["u-1"]);

        let missing = DefaultAttributeDefinition::new("eppn").with_attribute("cn");
        assert!(missing.resolve(&context()).unwrap().is_empty());
    }

    #[test]
    fn test_scoped_values_use_context_scope() {
        let definition = DefaultAttributeDefinition::new("eppn").with_scoped(true);

        let scoped = definition
            .resolve(&context().with_scope("example.org"))
            .unwrap();
        assert_eq!(scoped, vec!["casuser@example.org", "cas@example.org"]);

        let unscoped = definition.resolve(&context()).unwrap();
        assert_eq!(unscoped, vec!["casuser", "cas"]);
    }

    #[test]
    fn test_pattern_then_canonicalize_then_flatten() {
        let definition = DefaultAttributeDefinition::new("dn")
            .with_pattern_format("uid={0},ou=People")
            .with_canonicalization_mode(CanonicalizationMode::Lower)
            .with_flattened(true);

        let values = definition.resolve(&context()).unwrap();
        assert_eq!(values, vec!["uid=casuser,ou=people,uid=cas,ou=people"]);
    }

    #[test]
    fn test_pattern_without_placeholder_fails() {
        let definition = DefaultAttributeDefinition::new("dn").with_pattern_format("uid=");
        let result = definition.resolve(&context());
        assert!(matches!(
            result,
            Err(ResolutionError::InvalidPattern { ref key, .. }) if key == "dn"
        ));
    }

    #[test]
    fn test_serializes_camel_case() {
        let definition = DefaultAttributeDefinition::new("mail")
            .with_name("email")
            .with_pattern_format("{0}")
            .with_canonicalization_mode(CanonicalizationMode::Upper);
        let json = definition.to_json().unwrap();

        assert_eq!(json["key"], "mail");
        assert_eq!(json["name"], "email");
        assert_eq!(json["patternFormat"], "{0}");
        assert_eq!(json["canonicalizationMode"], "UPPER");
        assert!(json.get("attribute").is_none());
    }
}
