//! Education records of beneficiaries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub beneficiary_id: Uuid,
    pub institution: String,
    /// School level or diploma (free text, e.g. `secondary`).
    pub level: String,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EducationRecord {
    pub fn is_ongoing(&self, today: NaiveDate) -> bool {
        self.start_date <= today && self.end_date.is_none_or(|end| end >= today)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEducationRecord {
    pub beneficiary_id: Uuid,
    pub institution: String,
    pub level: String,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateEducationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

crate::tenant_entity!(
    EducationRecord,
    table = "education_record",
    create = CreateEducationRecord,
    update = UpdateEducationRecord,
    fields = [
        "beneficiary_id",
        "institution",
        "level",
        "subject",
        "grade",
        "start_date",
        "end_date",
    ],
    dates = ["start_date", "end_date"]
);
