//! Brand aggregate, service and inbound message worker.

mod aggregate;
mod service;
mod worker;

pub use aggregate::{Brand, BrandChange, CreateBrand, UpdateBrand};
pub use service::BrandService;
pub use worker::{BRAND_CREATED, BrandMessage, BrandMessageWorker};
