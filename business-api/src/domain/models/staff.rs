use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{BusinessId, ListSort, PageRequest, StaffId};
use crate::domain::StaffPassword;

pub const STAFF_SORT_COLUMNS: &[&str] = &["username", "fullname", "email", "role", "created_at"];

/// A staff member belonging to a business.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: StaffId,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub fullname: String,
    pub email: String,
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub business_id: BusinessId,
}

#[derive(Debug, Clone)]
pub struct NewStaff {
    pub username: String,
    pub password: StaffPassword,
    pub fullname: String,
    pub email: String,
    pub role: String,
    pub business_id: BusinessId,
}

/// Fields a caller supplies when registering staff, before validation and hashing.
#[derive(Debug, Clone, Default)]
pub struct StaffRegistration {
    pub username: String,
    pub password: String,
    pub fullname: String,
    pub email: String,
    pub role: String,
    pub business_id: Option<BusinessId>,
}

#[derive(Debug, Clone, Default)]
pub struct StaffUpdate {
    pub username: Option<String>,
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub business_id: Option<BusinessId>,
}

impl StaffUpdate {
    pub fn apply(self, staff: &mut Staff) {
        if let Some(username) = self.username {
            staff.username = username;
        }
        if let Some(fullname) = self.fullname {
            staff.fullname = fullname;
        }
        if let Some(email) = self.email {
            staff.email = email;
        }
        if let Some(role) = self.role {
            staff.role = role;
        }
        if let Some(business_id) = self.business_id {
            staff.business_id = business_id;
        }
    }
}

/// Exact-match staff filters.
#[derive(Debug, Clone, Default)]
pub struct StaffListQuery {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub business_id: Option<BusinessId>,
    pub page: PageRequest,
    pub sort: ListSort,
}

/// Case-insensitive substring search over full names.
#[derive(Debug, Clone, Default)]
pub struct StaffPageQuery {
    pub keyword: Option<String>,
    pub page: PageRequest,
    pub sort: ListSort,
}
