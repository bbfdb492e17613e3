pub(crate) mod business;
pub(crate) mod error;
pub(crate) mod extract;
pub(crate) mod logging;
pub(crate) mod search;
pub(crate) mod staff;

pub(crate) use error::ApiError;
