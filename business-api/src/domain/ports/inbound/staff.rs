use async_trait::async_trait;

use crate::domain::{
    models::{Page, Staff, StaffId, StaffListQuery, StaffPageQuery, StaffRegistration, StaffUpdate},
    StaffError,
};

#[async_trait]
pub trait StaffService: Send + Sync + 'static {
    async fn create_staff(&self, registration: StaffRegistration) -> Result<Staff, StaffError>;

    async fn get_staff(&self, id: StaffId) -> Result<Staff, StaffError>;

    async fn list_staff(&self, query: StaffListQuery) -> Result<Page<Staff>, StaffError>;

    async fn search_staff(&self, query: StaffPageQuery) -> Result<Page<Staff>, StaffError>;

    async fn update_staff(&self, id: StaffId, update: StaffUpdate) -> Result<Staff, StaffError>;

    async fn delete_staff(&self, id: StaffId) -> Result<(), StaffError>;
}
