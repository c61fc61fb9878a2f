//! Service configuration.

use civica_core::models::organization::SubscriptionPlan;

/// Configuration for the default-organization backfill.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    /// Slug identifying the default organization. This is its stable key:
    /// the UUID is whatever the first run generated.
    pub slug: String,
    /// Display name used when the organization has to be created.
    pub name: String,
    /// Contact email used when the organization has to be created.
    pub email: String,
    /// Plan assigned on creation.
    pub plan: SubscriptionPlan,
    /// Number of unassigned users fetched per page (default: 100).
    pub batch_size: u64,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            slug: "default".into(),
            name: "Default Organization".into(),
            email: "admin@localhost".into(),
            plan: SubscriptionPlan::Free,
            batch_size: 100,
        }
    }
}
