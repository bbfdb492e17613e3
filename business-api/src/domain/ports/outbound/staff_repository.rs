use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::models::{
    BusinessId, NewStaff, Page, Staff, StaffId, StaffListQuery, StaffPageQuery,
};

#[async_trait]
pub trait StaffRepository: Send + Sync + 'static {
    type Tx: Send + 'static;

    async fn begin(&self) -> Result<Self::Tx, RepositoryError>;

    async fn commit(&self, tx: Self::Tx) -> Result<(), RepositoryError>;

    async fn create(&self, staff: &NewStaff, tx: Option<&mut Self::Tx>)
        -> Result<Staff, RepositoryError>;

    async fn get_one(&self, id: StaffId, tx: Option<&mut Self::Tx>)
        -> Result<Staff, RepositoryError>;

    async fn update(&self, staff: &Staff, tx: Option<&mut Self::Tx>)
        -> Result<Staff, RepositoryError>;

    async fn delete(&self, id: StaffId, tx: Option<&mut Self::Tx>) -> Result<(), RepositoryError>;

    async fn list(
        &self,
        query: &StaffListQuery,
        tx: Option<&mut Self::Tx>,
    ) -> Result<Page<Staff>, RepositoryError>;

    async fn list_by_business(
        &self,
        business_id: BusinessId,
        tx: Option<&mut Self::Tx>,
    ) -> Result<Vec<Staff>, RepositoryError>;

    async fn search_by_fullname(
        &self,
        query: &StaffPageQuery,
        tx: Option<&mut Self::Tx>,
    ) -> Result<Page<Staff>, RepositoryError>;
}
