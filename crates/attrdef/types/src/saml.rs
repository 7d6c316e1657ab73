//! SAML identity provider attribute definition

use crate::context::ResolutionContext;
use crate::default::DefaultAttributeDefinition;
use crate::definition::AttributeDefinition;
use crate::error::ResolutionResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute definition released through a SAML assertion.
///
/// Resolves exactly like [`DefaultAttributeDefinition`]; the extra fields
/// only affect how the assertion names the attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamlAttributeDefinition {
    #[serde(flatten)]
    pub base: DefaultAttributeDefinition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    /// Formal attribute name, e.g. `urn:oid:0.9.2342.19200300.100.1.3`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
}

impl SamlAttributeDefinition {
    pub const TYPE_TAG: &'static str = "SamlIdPAttributeDefinition";

    pub fn new(key: impl Into<String>) -> Self {
        Self {
            base: DefaultAttributeDefinition::new(key),
            ..Default::default()
        }
    }

    pub fn with_friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    pub fn with_urn(mut self, urn: impl Into<String>) -> Self {
        self.urn = Some(urn.into());
        self
    }
}

impl AttributeDefinition for SamlAttributeDefinition {
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
        self.base.resolve(context)
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
