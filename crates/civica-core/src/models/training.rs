//! Training records for staff or beneficiaries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub provider: String,
    pub participant_user_id: Option<Uuid>,
    pub beneficiary_id: Option<Uuid>,
    pub hours: u32,
    pub completed_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrainingRecord {
    pub title: String,
    pub provider: String,
    pub participant_user_id: Option<Uuid>,
    pub beneficiary_id: Option<Uuid>,
    pub hours: u32,
    pub completed_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTrainingRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<NaiveDate>,
}

crate::tenant_entity!(
    TrainingRecord,
    table = "training_record",
    create = CreateTrainingRecord,
    update = UpdateTrainingRecord,
    fields = [
        "title",
        "provider",
        "participant_user_id",
        "beneficiary_id",
        "hours",
        "completed_on",
    ],
    dates = ["completed_on"]
);
