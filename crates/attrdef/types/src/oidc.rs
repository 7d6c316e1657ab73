//! OpenID Connect claim definition

use crate::context::ResolutionContext;
use crate::default::DefaultAttributeDefinition;
use crate::definition::AttributeDefinition;
use crate::error::ResolutionResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute definition released as an OIDC claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OidcAttributeDefinition {
    #[serde(flatten)]
    pub base: DefaultAttributeDefinition,

    /// Claim name is a dotted path into a nested claim object
    #[serde(default)]
    pub structured: bool,

    /// Release only the first resolved value
    #[serde(default)]
    pub single_value: bool,
}

impl OidcAttributeDefinition {
    pub const TYPE_TAG: &'static str = "OidcAttributeDefinition";

    pub fn new(key: impl Into<String>) -> Self {
        Self {
            base: DefaultAttributeDefinition::new(key),
            ..Default::default()
        }
    }

    pub fn with_structured(mut self, structured: bool) -> Self {
        self.structured = structured;
        self
    }

    pub fn with_single_value(mut self, single_value: bool) -> Self {
        self.single_value = single_value;
        self
    }
}

impl AttributeDefinition for OidcAttributeDefinition {
    fn key(&self) -> &str {
        &self.base.key
    }

    fn name(&self) -> Option<&str> {
        self.base.name.as_deref()
    }

    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn resolve_attribute_values(
        &self,
        context: &ResolutionContext,
    ) -> ResolutionResult<Vec<String>> {
        let mut values = self.base.resolve(context)?;
        if self.single_value {
            values.truncate(1);
        }
        Ok(values)
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
