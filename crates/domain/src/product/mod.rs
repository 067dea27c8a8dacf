//! Product aggregate and related types.

mod aggregate;
mod references;
mod service;

pub use aggregate::{CreateProduct, Product, ProductChange, ProductStatus, UpdateProduct};
pub use references::BrandReferences;
pub use service::ProductService;
