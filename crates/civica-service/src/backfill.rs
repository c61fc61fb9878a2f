//! Default-organization backfill.
//!
//! Brings every user without an organization into a single default
//! organization, creating that organization on first run. Running it
//! again creates nothing and assigns nothing.

use civica_core::error::{CivicaError, CivicaResult};
use civica_core::models::organization::{CreateOrganization, Organization};
use civica_core::repository::{
    Assignment, OrganizationRepository, Pagination, UserRepository,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::BackfillConfig;
use crate::error::ServiceError;
use crate::organization::validate_slug;

/// Outcome of one backfill run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub organization_id: Uuid,
    /// True when this run created the default organization.
    pub organization_created: bool,
    pub assigned: u64,
    /// Users that were assigned by someone else, or removed, while the
    /// run was in progress.
    pub skipped: u64,
    pub failed: u64,
}

pub struct DefaultOrganizationBackfill<O: OrganizationRepository, U: UserRepository> {
    org_repo: O,
    user_repo: U,
    config: BackfillConfig,
}

impl<O: OrganizationRepository, U: UserRepository> DefaultOrganizationBackfill<O, U> {
    pub fn new(org_repo: O, user_repo: U, config: BackfillConfig) -> Self {
        Self {
            org_repo,
            user_repo,
            config,
        }
    }

    pub async fn run(&self) -> CivicaResult<BackfillReport> {
        if self.config.batch_size == 0 {
            return Err(ServiceError::InvalidBatchSize.into());
        }
        validate_slug(&self.config.slug)?;

        let (organization, organization_created) = self.ensure_organization().await?;
        let mut report = BackfillReport {
            organization_id: organization.id,
            organization_created,
            assigned: 0,
            skipped: 0,
            failed: 0,
        };

        // Assigned users leave the unassigned set, so only failures
        // advance the offset.
        loop {
            let page = self
                .user_repo
                .list_unassigned(Pagination {
                    offset: report.failed,
                    limit: self.config.batch_size,
                })
                .await?;
            if page.items.is_empty() {
                break;
            }
            debug!(
                batch = page.items.len(),
                remaining = page.total,
                "Backfilling batch"
            );

            for user in page.items {
                match self
                    .user_repo
                    .assign_organization(user.id, organization.id)
                    .await
                {
                    Ok(Assignment::Assigned(_)) => report.assigned += 1,
                    // Assigned by someone else after this page was read.
                    Ok(Assignment::Unchanged(_))
                    | Err(CivicaError::AlreadyAssigned { .. } | CivicaError::NotFound { .. }) => {
                        report.skipped += 1;
                    }
                    Err(e) => {
                        warn!(user_id = %user.id, error = %e, "Failed to assign user");
                        report.failed += 1;
                    }
                }
            }
        }

        info!(
            organization_id = %report.organization_id,
            organization_created = report.organization_created,
            assigned = report.assigned,
            skipped = report.skipped,
            failed = report.failed,
            "Default organization backfill finished"
        );

        Ok(report)
    }

    /// Looks the organization up by slug and creates it when absent.
    async fn ensure_organization(&self) -> CivicaResult<(Organization, bool)> {
        match self.org_repo.get_by_slug(&self.config.slug).await {
            Ok(existing) => return Ok((existing, false)),
            Err(CivicaError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let input = CreateOrganization {
            slug: self.config.slug.clone(),
            name: self.config.name.clone(),
            email: self.config.email.clone(),
            plan: self.config.plan,
            quotas: None,
            metadata: None,
        };
        match self.org_repo.create(input).await {
            Ok(created) => {
                info!(
                    organization_id = %created.id,
                    slug = %created.slug,
                    "Default organization created"
                );
                Ok((created, true))
            }
            // Another run created it between the lookup and the insert.
            Err(CivicaError::AlreadyExists { .. }) => {
                let existing = self.org_repo.get_by_slug(&self.config.slug).await?;
                Ok((existing, false))
            }
            Err(e) => Err(e),
        }
    }
}
