//! In-app notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub recipient_user_id: Uuid,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    pub recipient_user_id: Uuid,
    pub title: String,
    pub body: String,
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
}

crate::tenant_entity!(
    Notification,
    table = "notification",
    create = CreateNotification,
    update = UpdateNotification,
    fields = ["recipient_user_id", "title", "body", "read"]
);
