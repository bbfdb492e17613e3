mod business;
mod search;
mod staff;

pub use business::*;
pub use search::*;
pub use staff::*;
