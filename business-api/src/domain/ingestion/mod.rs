//! Bulk creation of synthetic businesses through a bounded worker pool.

mod cancellation;
mod generator;
mod pipeline;

pub use cancellation::*;
pub use generator::*;
pub use pipeline::*;
