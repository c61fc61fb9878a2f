//! Budget line items.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetItem {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub label: String,
    pub category: String,
    pub kind: BudgetKind,
    /// Amount in minor currency units.
    pub amount_cents: i64,
    /// ISO 4217 code.
    pub currency: String,
    pub project_id: Option<Uuid>,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BudgetItem {
    /// Amount with the sign of its kind: expenses are negative.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            BudgetKind::Income => self.amount_cents,
            BudgetKind::Expense => -self.amount_cents,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBudgetItem {
    pub label: String,
    pub category: String,
    pub kind: BudgetKind,
    pub amount_cents: i64,
    pub currency: String,
    pub project_id: Option<Uuid>,
    pub occurred_on: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateBudgetItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<BudgetKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_on: Option<NaiveDate>,
}

crate::tenant_entity!(
    BudgetItem,
    table = "budget_item",
    create = CreateBudgetItem,
    update = UpdateBudgetItem,
    fields = [
        "label",
        "category",
        "kind",
        "amount_cents",
        "currency",
        "project_id",
        "occurred_on",
    ],
    dates = ["occurred_on"]
);
