//! Identity and version types shared by every catalog crate.

mod types;

pub use types::{AggregateId, Version};
