use std::sync::Arc;

use crate::{
    config::Environment,
    domain::ports::inbound::{BusinessService, SearchService, StaffService},
};

#[derive(Clone)]
pub struct AppState {
    pub business_service: Arc<dyn BusinessService>,
    pub staff_service: Arc<dyn StaffService>,
    pub search_service: Arc<dyn SearchService>,
    /// Index searched when a request does not name one.
    pub default_index: Arc<str>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(
        business_service: Arc<dyn BusinessService>,
        staff_service: Arc<dyn StaffService>,
        search_service: Arc<dyn SearchService>,
        default_index: impl Into<Arc<str>>,
        environment: Environment,
    ) -> Self {
        Self {
            business_service,
            staff_service,
            search_service,
            default_index: default_index.into(),
            environment,
        }
    }
}
