mod document_index;
mod repositories;

pub use document_index::*;
pub use repositories::*;
