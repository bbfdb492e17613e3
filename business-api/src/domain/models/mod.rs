mod business;
mod ids;
mod pagination;
mod search;
mod staff;

pub use business::*;
pub use ids::*;
pub use pagination::*;
pub use search::*;
pub use staff::*;
