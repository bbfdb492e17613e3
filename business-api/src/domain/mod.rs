mod email;
mod error;
mod staff_password;

pub mod ingestion;
pub mod models;
pub mod ports;
pub mod search;
pub mod services;

pub use email::*;
pub use error::*;
pub use staff_password::*;
