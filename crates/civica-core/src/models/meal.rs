//! Meals served.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// `None` for anonymous distributions.
    pub beneficiary_id: Option<Uuid>,
    pub served_on: NaiveDate,
    pub meal_type: MealType,
    pub portions: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMeal {
    pub beneficiary_id: Option<Uuid>,
    pub served_on: NaiveDate,
    pub meal_type: MealType,
    pub portions: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateMeal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub served_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

crate::tenant_entity!(
    Meal,
    table = "meal",
    create = CreateMeal,
    update = UpdateMeal,
    fields = ["beneficiary_id", "served_on", "meal_type", "portions", "notes"],
    dates = ["served_on"]
);
