//! HTTP request payloads and query strings.
//!
//! These mirror the JSON the API has always accepted (`type` rather than
//! `businessType`, snake_case paging keys) and convert into domain types.

use serde::Deserialize;

use crate::domain::models::{
    BusinessId, BusinessListQuery, BusinessUpdate, FieldCombinator, ListSort, NewBusiness,
    PageRequest, SearchFilter, SearchRequest, StaffListQuery, StaffPageQuery, StaffRegistration,
    StaffUpdate, BUSINESS_SORT_COLUMNS, STAFF_SORT_COLUMNS,
};

/// Body of `POST /business/create` and `PUT /business/update/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BusinessPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type", alias = "businessType", alias = "business_type")]
    pub business_type: Option<String>,
    pub status: Option<String>,
}

impl From<BusinessPayload> for NewBusiness {
    fn from(payload: BusinessPayload) -> Self {
        NewBusiness {
            name: payload.name.unwrap_or_default(),
            description: payload.description.unwrap_or_default(),
            address: payload.address.unwrap_or_default(),
            business_type: payload.business_type.unwrap_or_default(),
            status: payload.status.unwrap_or_default(),
            worker_name: String::new(),
        }
    }
}

impl From<BusinessPayload> for BusinessUpdate {
    fn from(payload: BusinessPayload) -> Self {
        BusinessUpdate {
            name: payload.name,
            description: payload.description,
            address: payload.address,
            business_type: payload.business_type,
            status: payload.status,
        }
    }
}

/// Treats `?name=` the same as an absent parameter.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BusinessListParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub business_type: Option<String>,
    pub status: Option<String>,
    pub worker_name: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<String>,
}

impl From<BusinessListParams> for BusinessListQuery {
    fn from(params: BusinessListParams) -> Self {
        BusinessListQuery {
            name: present(params.name),
            description: present(params.description),
            address: present(params.address),
            business_type: present(params.business_type),
            status: present(params.status),
            worker_name: present(params.worker_name),
            page: PageRequest::new(params.page, params.page_size),
            sort: ListSort::parse_or_default(params.sort.as_deref(), BUSINESS_SORT_COLUMNS),
        }
    }
}

/// Body of `POST /staff/create`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StaffPayload {
    pub username: String,
    pub password: String,
    pub fullname: String,
    pub email: String,
    pub role: String,
    #[serde(alias = "businessId")]
    pub business_id: Option<BusinessId>,
}

impl From<StaffPayload> for StaffRegistration {
    fn from(payload: StaffPayload) -> Self {
        StaffRegistration {
            username: payload.username,
            password: payload.password,
            fullname: payload.fullname,
            email: payload.email,
            role: payload.role,
            business_id: payload.business_id,
        }
    }
}

/// Body of `PUT /staff/update/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StaffUpdatePayload {
    pub username: Option<String>,
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(alias = "businessId")]
    pub business_id: Option<BusinessId>,
}

impl From<StaffUpdatePayload> for StaffUpdate {
    fn from(payload: StaffUpdatePayload) -> Self {
        StaffUpdate {
            username: payload.username,
            fullname: payload.fullname,
            email: payload.email,
            role: payload.role,
            business_id: payload.business_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StaffListParams {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub business_id: Option<BusinessId>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<String>,
}

impl From<StaffListParams> for StaffListQuery {
    fn from(params: StaffListParams) -> Self {
        StaffListQuery {
            username: present(params.username),
            email: present(params.email),
            role: present(params.role),
            business_id: params.business_id,
            page: PageRequest::new(params.page, params.page_size),
            sort: ListSort::parse_or_default(params.sort.as_deref(), STAFF_SORT_COLUMNS),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StaffPageParams {
    pub keyword: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<String>,
}

impl From<StaffPageParams> for StaffPageQuery {
    fn from(params: StaffPageParams) -> Self {
        StaffPageQuery {
            keyword: present(params.keyword),
            page: PageRequest::new(params.page, params.page_size),
            sort: ListSort::parse_or_default(params.sort.as_deref(), STAFF_SORT_COLUMNS),
        }
    }
}

/// Body of the search endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchPayload {
    pub index: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// `field:direction`
    pub sort: Option<String>,
    pub filters: SearchFilter,
    #[serde(rename = "_source")]
    pub source: Vec<String>,
    pub combinator: FieldCombinator,
}

impl SearchPayload {
    /// Normalizes paging and falls back to `default_index` when no index was named.
    pub fn into_request(self, default_index: &str) -> SearchRequest {
        let index = present(self.index).unwrap_or_else(|| default_index.to_string());

        let request = SearchRequest::new(index, self.page, self.size)
            .with_filters(self.filters)
            .with_source(self.source)
            .with_combinator(self.combinator);

        match present(self.sort) {
            Some(sort) => request.with_sort(sort),
            None => request,
        }
    }
}
