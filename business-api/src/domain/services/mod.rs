mod business;
mod search;
mod staff;

pub use business::BusinessServiceImpl;
pub use search::{SearchConfig, SearchServiceImpl};
pub use staff::StaffServiceImpl;
