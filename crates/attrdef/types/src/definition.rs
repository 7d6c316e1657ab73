//! Attribute definition trait
//!
//! Definitions are shared as `Arc<dyn AttributeDefinition>`. The [`AsAny`]
//! supertrait lets stores hand back a concrete variant for type-filtered
//! lookups without knowing the variant set up front.

use crate::context::ResolutionContext;
use crate::error::ResolutionResult;
use serde_json::Value;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// Downcasting support for definition trait objects.
///
/// Implemented for every `Send + Sync + 'static` type; variants never
/// implement it by hand.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A named rule describing how to compute the values of a principal attribute.
pub trait AttributeDefinition: AsAny + Debug {
    /// Registry key declared by the definition itself. May be empty.
    fn key(&self) -> &str;

    /// Optional alias used by name lookups.
    fn name(&self) -> Option<&str>;

    /// Discriminator written to persisted definition files.
    fn type_tag(&self) -> &'static str;

    /// Compute attribute values for the given context.
    fn resolve_attribute_values(
        &self,
        context: &ResolutionContext,
    ) -> ResolutionResult<Vec<String>>;

    /// Serialize the definition payload, without its discriminator.
    fn to_json(&self) -> serde_json::Result<Value>;

    /// Whether the definition carries a non-blank name.
    fn has_name(&self) -> bool {
        self.name().is_some_and(|name| !name.trim().is_empty())
    }
}

impl dyn AttributeDefinition {
    /// Borrow the definition as a concrete variant.
    pub fn downcast_ref<T: AttributeDefinition>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Check whether the definition is of the given variant.
    pub fn is<T: AttributeDefinition>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Convert a shared definition into a shared concrete variant.
pub fn downcast_arc<T: AttributeDefinition>(
    definition: Arc<dyn AttributeDefinition>,
) -> Option<Arc<T>> {
    definition.into_any_arc().downcast::<T>().ok()
}
