use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{BusinessId, ListSort, PageRequest, Staff};

/// Columns a business list may be ordered by.
pub const BUSINESS_SORT_COLUMNS: &[&str] = &[
    "name",
    "address",
    "business_type",
    "status",
    "worker_name",
    "created_at",
];

/// A stored business together with its staff (when loaded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub business_type: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub worker_name: String,
    #[serde(default)]
    pub staffs: Vec<Staff>,
}

/// A business that has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBusiness {
    pub name: String,
    pub description: String,
    pub address: String,
    pub business_type: String,
    pub status: String,
    pub worker_name: String,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct BusinessUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub business_type: Option<String>,
    pub status: Option<String>,
}

impl BusinessUpdate {
    pub fn apply(self, business: &mut Business) {
        if let Some(name) = self.name {
            business.name = name;
        }
        if let Some(description) = self.description {
            business.description = description;
        }
        if let Some(address) = self.address {
            business.address = address;
        }
        if let Some(business_type) = self.business_type {
            business.business_type = business_type;
        }
        if let Some(status) = self.status {
            business.status = status;
        }
    }
}

/// Exact-match filters plus paging for business listings.
#[derive(Debug, Clone, Default)]
pub struct BusinessListQuery {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub business_type: Option<String>,
    pub status: Option<String>,
    pub worker_name: Option<String>,
    pub page: PageRequest,
    pub sort: ListSort,
}

impl BusinessListQuery {
    /// Unfiltered listing, oldest first so paging stays stable while rows are appended.
    pub fn everything(page: PageRequest) -> Self {
        Self {
            page,
            sort: ListSort {
                column: "created_at",
                direction: super::SortDirection::Asc,
            },
            ..Default::default()
        }
    }
}
