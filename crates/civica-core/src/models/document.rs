//! Document metadata. File contents live in external storage under
//! `storage_key`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub storage_key: String,
    pub beneficiary_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    pub title: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub storage_key: String,
    pub beneficiary_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_id: Option<Uuid>,
}

crate::tenant_entity!(
    Document,
    table = "document",
    create = CreateDocument,
    update = UpdateDocument,
    fields = [
        "title",
        "file_name",
        "mime_type",
        "size_bytes",
        "storage_key",
        "beneficiary_id",
    ]
);
