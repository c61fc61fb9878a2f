//! Organization administration.
//!
//! Provisioning is a platform operation and takes no actor. Everything
//! else is confined to the acting user's own organization; being an
//! organization administrator never reaches another organization.

use civica_core::access::Actor;
use civica_core::error::{CivicaError, CivicaResult};
use civica_core::models::organization::{CreateOrganization, Organization, UpdateOrganization};
use civica_core::models::user::User;
use civica_core::repository::{
    OrganizationRepository, PaginatedResult, Pagination, UserRepository,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ServiceError;

/// Slugs are lowercase ASCII letters, digits and single hyphens, and do
/// not start or end with a hyphen.
pub fn validate_slug(slug: &str) -> Result<(), ServiceError> {
    let well_formed = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if well_formed {
        Ok(())
    } else {
        Err(ServiceError::InvalidSlug(slug.to_string()))
    }
}

/// The organization an administrator acts on.
fn admin_organization(actor: Option<&Actor>) -> CivicaResult<(Uuid, Uuid)> {
    let actor = actor.ok_or(CivicaError::Unauthorized)?;
    let organization_id = actor.organization()?;
    if !actor.is_admin {
        warn!(
            user_id = %actor.user_id,
            organization_id = %organization_id,
            "Organization administration attempted without admin privileges"
        );
        return Err(ServiceError::AdminRequired.into());
    }
    Ok((actor.user_id, organization_id))
}

/// Organization service.
///
/// Generic over repository implementations so that the service layer
/// has no dependency on the database crate.
pub struct OrganizationService<O: OrganizationRepository, U: UserRepository> {
    org_repo: O,
    user_repo: U,
}

impl<O: OrganizationRepository, U: UserRepository> OrganizationService<O, U> {
    pub fn new(org_repo: O, user_repo: U) -> Self {
        Self {
            org_repo,
            user_repo,
        }
    }

    pub async fn create_organization(
        &self,
        input: CreateOrganization,
    ) -> CivicaResult<Organization> {
        validate_slug(&input.slug)?;
        if input.name.trim().is_empty() {
            return Err(CivicaError::validation("organization name must not be empty"));
        }
        self.org_repo.create(input).await
    }

    /// The acting user's own organization.
    pub async fn current(&self, actor: Option<&Actor>) -> CivicaResult<Organization> {
        let actor = actor.ok_or(CivicaError::Unauthorized)?;
        self.org_repo.get_by_id(actor.organization()?).await
    }

    pub async fn update_settings(
        &self,
        actor: Option<&Actor>,
        input: UpdateOrganization,
    ) -> CivicaResult<Organization> {
        let (user_id, organization_id) = admin_organization(actor)?;
        let updated = self.org_repo.update(organization_id, input).await?;
        info!(
            user_id = %user_id,
            organization_id = %organization_id,
            "Organization settings updated"
        );
        Ok(updated)
    }

    /// Brings an unassigned user into the administrator's organization.
    pub async fn assign_user(&self, actor: Option<&Actor>, user_id: Uuid) -> CivicaResult<User> {
        let (admin_id, organization_id) = admin_organization(actor)?;
        let assignment = self
            .user_repo
            .assign_organization(user_id, organization_id)
            .await?;
        if assignment.is_assigned() {
            info!(
                admin_id = %admin_id,
                user_id = %user_id,
                organization_id = %organization_id,
                "User added to organization"
            );
        }
        Ok(assignment.into_user())
    }

    pub async fn list_members(
        &self,
        actor: Option<&Actor>,
        pagination: Pagination,
    ) -> CivicaResult<PaginatedResult<User>> {
        let actor = actor.ok_or(CivicaError::Unauthorized)?;
        self.user_repo
            .list_by_organization(actor.organization()?, pagination)
            .await
    }
}
