//! Attribute definition model
//!
//! An attribute definition describes how to compute the values of one
//! principal attribute at release time. This crate provides:
//!
//! - **AttributeDefinition**: The trait every definition variant implements
//! - **ResolutionContext**: Per-query inputs (scope, principal, current values)
//! - **Built-in variants**: Default, SAML and OIDC flavoured definitions
//!
//! ## Variants are open-ended
//!
//! Nothing in this crate enumerates the full set of variants. Stores decode
//! definitions through a discriminator-keyed decoder, so downstream crates can
//! add their own types by implementing [`AttributeDefinition`].

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod context;
pub mod default;
pub mod definition;
pub mod error;
pub mod oidc;
pub mod saml;

// Re-exports
pub use context::ResolutionContext;
pub use default::{CanonicalizationMode, DefaultAttributeDefinition};
pub use definition::{downcast_arc, AsAny, AttributeDefinition};
pub use error::{ResolutionError, ResolutionResult};
pub use oidc::OidcAttributeDefinition;
pub use saml::SamlAttributeDefinition;
