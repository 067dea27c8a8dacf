pub mod brands;
pub mod health;
pub mod metrics;
pub mod products;
pub mod variants;
