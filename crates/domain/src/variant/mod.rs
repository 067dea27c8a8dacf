//! Variant aggregate and related types.

mod aggregate;
mod references;
mod service;

pub use aggregate::{
    Attributes, CreateVariant, MAX_ATTRIBUTES, UpdateVariant, Variant, VariantChange,
    normalize_attributes,
};
pub use references::VariantReferences;
pub use service::VariantService;
