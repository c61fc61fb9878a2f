//! Interventions: actions taken by staff for a beneficiary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InterventionStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub beneficiary_id: Uuid,
    pub kind: String,
    pub description: String,
    pub status: InterventionStatus,
    pub scheduled_on: Option<NaiveDate>,
    pub staff_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIntervention {
    pub beneficiary_id: Uuid,
    pub kind: String,
    pub description: String,
    pub status: InterventionStatus,
    pub scheduled_on: Option<NaiveDate>,
    pub staff_user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateIntervention {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InterventionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_user_id: Option<Uuid>,
}

crate::tenant_entity!(
    Intervention,
    table = "intervention",
    create = CreateIntervention,
    update = UpdateIntervention,
    fields = [
        "beneficiary_id",
        "kind",
        "description",
        "status",
        "scheduled_on",
        "staff_user_id",
    ],
    dates = ["scheduled_on"]
);
