use async_trait::async_trait;

use crate::domain::{
    ingestion::{CancellationSignal, IngestionReport},
    models::{Business, BusinessId, BusinessListQuery, BusinessUpdate, NewBusiness, Page},
    BusinessError,
};

#[async_trait]
pub trait BusinessService: Send + Sync + 'static {
    async fn create_business(&self, business: NewBusiness) -> Result<Business, BusinessError>;

    /// Generates and bulk-inserts synthetic businesses through the worker pool.
    ///
    /// Returns once every worker has reported, whether or not all batches succeeded.
    async fn create_generated_businesses(
        &self,
        cancel: CancellationSignal,
    ) -> Result<IngestionReport, BusinessError>;

    /// Loads the business and attaches staff through a second lookup.
    async fn get_business(&self, id: BusinessId) -> Result<Business, BusinessError>;

    /// Loads the business with staff eagerly joined by the repository.
    async fn get_business_with_staffs(&self, id: BusinessId) -> Result<Business, BusinessError>;

    async fn list_businesses(
        &self,
        query: BusinessListQuery,
    ) -> Result<Page<Business>, BusinessError>;

    async fn list_businesses_with_staffs(
        &self,
        query: BusinessListQuery,
    ) -> Result<Page<Business>, BusinessError>;

    async fn update_business(
        &self,
        id: BusinessId,
        update: BusinessUpdate,
    ) -> Result<Business, BusinessError>;

    async fn delete_business(&self, id: BusinessId) -> Result<(), BusinessError>;
}
