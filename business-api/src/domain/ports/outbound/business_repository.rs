use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::models::{Business, BusinessId, BusinessListQuery, NewBusiness, Page};

/// Persistence for businesses.
///
/// Every method takes an optional transaction. With `None` the implementation opens its
/// own connection (and transaction for writes) bounded by its configured query timeout.
#[async_trait]
pub trait BusinessRepository: Send + Sync + 'static {
    type Tx: Send + 'static;

    async fn begin(&self) -> Result<Self::Tx, RepositoryError>;

    async fn commit(&self, tx: Self::Tx) -> Result<(), RepositoryError>;

    async fn create(
        &self,
        business: &NewBusiness,
        tx: Option<&mut Self::Tx>,
    ) -> Result<Business, RepositoryError>;

    /// Inserts all rows in one statement and returns them with their generated ids.
    async fn create_batch(
        &self,
        businesses: &[NewBusiness],
        tx: Option<&mut Self::Tx>,
    ) -> Result<Vec<Business>, RepositoryError>;

    /// Returns `RepositoryError::NotFound` when no row matches.
    async fn get_one(
        &self,
        id: BusinessId,
        tx: Option<&mut Self::Tx>,
    ) -> Result<Business, RepositoryError>;

    async fn get_one_with_staffs(
        &self,
        id: BusinessId,
        tx: Option<&mut Self::Tx>,
    ) -> Result<Business, RepositoryError>;

    async fn update(
        &self,
        business: &Business,
        tx: Option<&mut Self::Tx>,
    ) -> Result<Business, RepositoryError>;

    async fn delete(&self, id: BusinessId, tx: Option<&mut Self::Tx>)
        -> Result<(), RepositoryError>;

    async fn list(
        &self,
        query: &BusinessListQuery,
        tx: Option<&mut Self::Tx>,
    ) -> Result<Page<Business>, RepositoryError>;

    async fn list_with_staffs(
        &self,
        query: &BusinessListQuery,
        tx: Option<&mut Self::Tx>,
    ) -> Result<Page<Business>, RepositoryError>;
}
