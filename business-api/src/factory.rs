//! Composition root: wires concrete outbound adapters into the domain services.
//!
//! This is the ONLY place that imports concrete outbound adapters.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    adapters::outbound::{
        opensearch::OpenSearchIndex,
        postgres::{PostgresBusinessRepository, PostgresStaffRepository},
    },
    app_state::AppState,
    config::Settings,
    domain::{
        ports::outbound::{DocumentIndex, DocumentIndexError},
        services::{BusinessServiceImpl, SearchServiceImpl, StaffServiceImpl},
    },
};

/// Connects to the search backend; the client is lazy, so this never touches the network.
pub fn create_document_index(
    settings: &Settings,
) -> Result<Arc<OpenSearchIndex>, DocumentIndexError> {
    Ok(Arc::new(OpenSearchIndex::new(&settings.search.url)?))
}

pub fn create_app_state<I: DocumentIndex>(
    pool: PgPool,
    index: Arc<I>,
    settings: &Settings,
) -> AppState {
    let query_timeout = settings.database.query_timeout();
    let businesses = Arc::new(PostgresBusinessRepository::new(pool.clone(), query_timeout));
    let staff = Arc::new(PostgresStaffRepository::new(pool, query_timeout));

    let business_service = BusinessServiceImpl::new(
        Arc::clone(&businesses),
        Arc::clone(&staff),
        settings.ingestion.clone(),
    );
    let staff_service = StaffServiceImpl::new(staff);
    let search_service =
        SearchServiceImpl::new(businesses, index, settings.search.index_config());

    AppState::new(
        Arc::new(business_service),
        Arc::new(staff_service),
        Arc::new(search_service),
        settings.search.index_name.as_str(),
        settings.application.environment,
    )
}
