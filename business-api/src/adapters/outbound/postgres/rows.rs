use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::models::{Business, BusinessId, Staff, StaffId};

pub(super) const BUSINESS_COLUMNS: &str =
    "id, name, description, address, business_type, status, worker_name, created_at";

pub(super) const STAFF_COLUMNS: &str =
    "id, username, password, fullname, email, role, business_id, created_at";

#[derive(Debug, sqlx::FromRow)]
pub(super) struct BusinessRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub business_type: String,
    pub status: String,
    pub worker_name: String,
    pub created_at: OffsetDateTime,
}

impl BusinessRow {
    pub fn into_business(self, staffs: Vec<Staff>) -> Business {
        Business {
            id: BusinessId::new(self.id),
            name: self.name,
            description: self.description,
            address: self.address,
            business_type: self.business_type,
            status: self.status,
            created_at: self.created_at,
            worker_name: self.worker_name,
            staffs,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct StaffRow {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub fullname: String,
    pub email: String,
    pub role: String,
    pub business_id: Uuid,
    pub created_at: OffsetDateTime,
}

impl From<StaffRow> for Staff {
    fn from(row: StaffRow) -> Self {
        Staff {
            id: StaffId::new(row.id),
            username: row.username,
            password_hash: row.password,
            fullname: row.fullname,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
            business_id: BusinessId::new(row.business_id),
        }
    }
}
