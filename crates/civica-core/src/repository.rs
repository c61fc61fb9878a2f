//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Organizations and users are
//! global. Tenant-owned entities are reached only through
//! [`ScopedRepository`], whose methods accept guard-produced
//! [`ScopedFilter`]s and [`ScopedPayload`]s and nothing else.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::access::{ScopedFilter, ScopedPayload};
use crate::entity::TenantEntity;
use crate::error::CivicaResult;
use crate::models::{
    organization::{CreateOrganization, Organization, UpdateOrganization},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Result of assigning a user to an organization.
#[derive(Debug, Clone)]
pub enum Assignment {
    /// The user had no organization and now belongs to the requested one.
    Assigned(User),
    /// The user already belonged to the requested organization.
    Unchanged(User),
}

impl Assignment {
    pub fn user(&self) -> &User {
        match self {
            Self::Assigned(user) | Self::Unchanged(user) => user,
        }
    }

    pub fn into_user(self) -> User {
        match self {
            Self::Assigned(user) | Self::Unchanged(user) => user,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

// ---------------------------------------------------------------------------
// Organization & User (global scope)
// ---------------------------------------------------------------------------

/// Organizations have no delete: lifecycle goes through `status`.
pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = CivicaResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CivicaResult<Organization>> + Send;
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = CivicaResult<Organization>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateOrganization,
    ) -> impl Future<Output = CivicaResult<Organization>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CivicaResult<PaginatedResult<Organization>>> + Send;
}

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = CivicaResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CivicaResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = CivicaResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = CivicaResult<User>> + Send;

    /// One-way assignment of an unassigned user.
    ///
    /// Returns [`Assignment::Unchanged`] if the user already belongs to
    /// `organization_id`; fails with `AlreadyAssigned` if the user belongs
    /// to another organization.
    fn assign_organization(
        &self,
        id: Uuid,
        organization_id: Uuid,
    ) -> impl Future<Output = CivicaResult<Assignment>> + Send;

    /// Users without an organization, oldest first.
    fn list_unassigned(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CivicaResult<PaginatedResult<User>>> + Send;

    fn list_by_organization(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = CivicaResult<PaginatedResult<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-owned entities
// ---------------------------------------------------------------------------

/// Data access for one tenant-owned entity type.
///
/// Every method takes its organization from the scoped argument; the
/// organization constraint must be part of the same statement as the data
/// operation.
pub trait ScopedRepository<E: TenantEntity>: Send + Sync {
    fn create(&self, payload: ScopedPayload) -> impl Future<Output = CivicaResult<E>> + Send;

    /// Matching rows, oldest first.
    fn find(
        &self,
        filter: ScopedFilter,
        pagination: Pagination,
    ) -> impl Future<Output = CivicaResult<PaginatedResult<E>>> + Send;

    /// The first matching row, or `NotFound`.
    fn find_one(&self, filter: ScopedFilter) -> impl Future<Output = CivicaResult<E>> + Send;

    /// Applies `patch` to every matching row and returns the updated rows.
    fn update(
        &self,
        filter: ScopedFilter,
        patch: Map<String, Value>,
    ) -> impl Future<Output = CivicaResult<Vec<E>>> + Send;

    /// Deletes every matching row and returns how many were removed.
    fn delete(&self, filter: ScopedFilter) -> impl Future<Output = CivicaResult<u64>> + Send;

    fn count(&self, filter: ScopedFilter) -> impl Future<Output = CivicaResult<u64>> + Send;
}
