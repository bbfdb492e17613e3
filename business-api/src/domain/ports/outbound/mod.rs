mod business_repository;
mod document_index;
mod error;
mod staff_repository;

pub use business_repository::*;
pub use document_index::*;
pub use error::*;
pub use staff_repository::*;
