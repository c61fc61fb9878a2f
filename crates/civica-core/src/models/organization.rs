//! Organization domain model.
//!
//! Organizations are Civica's tenants. Users and every tenant-owned
//! entity belong to exactly one organization. Organizations are never
//! hard-deleted; their lifecycle is carried by [`OrganizationStatus`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrganizationStatus {
    Active,
    Suspended,
    Archived,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubscriptionPlan {
    Free,
    Starter,
    Professional,
    Enterprise,
}

/// Numeric limits attached to an organization's plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quotas {
    pub max_users: u32,
    pub max_beneficiaries: u32,
    /// Document storage in bytes.
    pub max_storage: u64,
}

impl Default for Quotas {
    fn default() -> Self {
        Self {
            max_users: 10,
            max_beneficiaries: 500,
            max_storage: 5 * 1024 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    /// URL-safe unique identifier (e.g., `food-bank-north`).
    pub slug: String,
    pub name: String,
    /// Administrative contact address.
    pub email: String,
    pub status: OrganizationStatus,
    pub plan: SubscriptionPlan,
    pub quotas: Quotas,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub slug: String,
    pub name: String,
    pub email: String,
    pub plan: SubscriptionPlan,
    /// Plan defaults when `None`.
    pub quotas: Option<Quotas>,
    pub metadata: Option<serde_json::Value>,
}

/// Fields that can be updated on an existing organization.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<OrganizationStatus>,
    pub plan: Option<SubscriptionPlan>,
    pub quotas: Option<Quotas>,
    pub metadata: Option<serde_json::Value>,
}
