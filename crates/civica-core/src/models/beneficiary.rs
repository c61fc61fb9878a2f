//! Beneficiary domain model.
//!
//! A beneficiary is a person supported by an organization. Most other
//! tenant-owned records (education, interventions, meals, documents)
//! reference one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classification::AgeCategory;
use crate::error::CivicaResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Beneficiary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age category on `today`, or `None` without a birth date.
    pub fn category_on(&self, today: NaiveDate) -> CivicaResult<Option<AgeCategory>> {
        self.birth_date
            .map(|birth| AgeCategory::classify(birth, today))
            .transpose()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateBeneficiary {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateBeneficiary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

crate::tenant_entity!(
    Beneficiary,
    table = "beneficiary",
    create = CreateBeneficiary,
    update = UpdateBeneficiary,
    fields = [
        "first_name",
        "last_name",
        "birth_date",
        "gender",
        "phone",
        "email",
        "address",
        "notes",
    ],
    dates = ["birth_date"]
);
