//! Domain layer for the product catalog.
//!
//! This crate provides the versioned aggregate mutation engine and its three
//! instantiations:
//! - Aggregate trait with a declarative, ordered table of mutable fields
//! - Field-diff event generation and the optimistic version guard
//! - Cross-aggregate reference validation
//! - Product, Variant and Brand aggregates with their services
//! - Event publishers and the inbound brand message worker

pub mod aggregate;
pub mod brand;
pub mod diff;
pub mod engine;
pub mod error;
pub mod event;
pub mod guard;
pub mod product;
pub mod publisher;
pub mod references;
pub mod variant;

pub use aggregate::{Aggregate, FieldRule};
pub use brand::{
    BRAND_CREATED, Brand, BrandChange, BrandMessage, BrandMessageWorker, BrandService,
    CreateBrand, UpdateBrand,
};
pub use diff::{FieldDiff, diff_fields};
pub use engine::MutationEngine;
pub use error::{DomainError, ErrorKind, FieldError, FieldErrors};
pub use event::{Change, DomainEvent};
pub use guard::check_version;
pub use product::{
    BrandReferences, CreateProduct, Product, ProductChange, ProductService, ProductStatus,
    UpdateProduct,
};
pub use publisher::{ChannelPublisher, EventPublisher, InMemoryPublisher};
pub use references::{NoReferences, ReferenceValidator};
pub use variant::{
    Attributes, CreateVariant, MAX_ATTRIBUTES, UpdateVariant, Variant, VariantChange,
    VariantReferences, VariantService,
};
