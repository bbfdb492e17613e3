//! The indexed representation of a business and the index mapping it is stored under.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use time::OffsetDateTime;

use crate::domain::models::{Business, BusinessId, SearchHit, Staff, StaffId};

/// Field mapping used when the business index is created.
pub fn business_index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "name": { "type": "text" },
                "description": { "type": "text" },
                "address": { "type": "text" },
                "businessType": { "type": "keyword" },
                "status": { "type": "keyword" },
                "createAt": { "type": "date" },
                "workerName": { "type": "text" },
                "staffs": {
                    "type": "nested",
                    "properties": {
                        "id": { "type": "keyword" },
                        "name": { "type": "text" },
                        "role": { "type": "keyword" }
                    }
                }
            }
        }
    })
}

/// A business as stored in the search index.
///
/// Every field defaults so partially projected sources still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessDocument {
    pub id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub business_type: String,
    pub status: String,
    #[serde(rename = "createAt", with = "time::serde::rfc3339::option")]
    pub create_at: Option<OffsetDateTime>,
    pub worker_name: String,
    pub staffs: Vec<StaffDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaffDocument {
    pub id: String,
    /// Full name.
    pub name: String,
    pub role: String,
    pub username: String,
    pub email: String,
    #[serde(rename = "createAt", with = "time::serde::rfc3339::option")]
    pub create_at: Option<OffsetDateTime>,
}

impl From<&Business> for BusinessDocument {
    fn from(business: &Business) -> Self {
        Self {
            id: business.id.to_string(),
            name: business.name.clone(),
            description: business.description.clone(),
            address: business.address.clone(),
            business_type: business.business_type.clone(),
            status: business.status.clone(),
            create_at: Some(business.created_at),
            worker_name: business.worker_name.clone(),
            staffs: business.staffs.iter().map(StaffDocument::from).collect(),
        }
    }
}

impl From<&Staff> for StaffDocument {
    fn from(staff: &Staff) -> Self {
        Self {
            id: staff.id.to_string(),
            name: staff.fullname.clone(),
            role: staff.role.clone(),
            username: staff.username.clone(),
            email: staff.email.clone(),
            create_at: Some(staff.created_at),
        }
    }
}

impl BusinessDocument {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Builds the business under `id`, regardless of the id stored in the document.
    pub fn into_business(self, id: BusinessId) -> Business {
        let created_at = self.create_at.unwrap_or(OffsetDateTime::UNIX_EPOCH);
        let staffs = self
            .staffs
            .into_iter()
            .filter_map(|staff| {
                let staff_id = staff.id.parse::<uuid::Uuid>().ok()?;
                Some(Staff {
                    id: StaffId::new(staff_id),
                    username: staff.username,
                    password_hash: String::new(),
                    fullname: staff.name,
                    email: staff.email,
                    role: staff.role,
                    created_at: staff.create_at.unwrap_or(created_at),
                    business_id: id,
                })
            })
            .collect();

        Business {
            id,
            name: self.name,
            description: self.description,
            address: self.address,
            business_type: self.business_type,
            status: self.status,
            created_at,
            worker_name: self.worker_name,
            staffs,
        }
    }
}

/// Maps a hit back into a business whose id is the hit's document id.
///
/// Returns `None` when the source does not deserialize or no usable id exists.
pub fn business_from_hit(hit: &SearchHit) -> Option<Business> {
    let document: BusinessDocument = serde_json::from_value(hit.source.clone()).ok()?;
    let id = hit
        .id
        .parse::<BusinessId>()
        .ok()
        .or_else(|| document.id.parse().ok())?;
    Some(document.into_business(id))
}
