//! Generic service over one tenant-owned entity type.
//!
//! Every operation passes the acting user through the access guard before
//! touching the repository. A row owned by another organization is
//! reported as `NotFound`, exactly like a missing one.

use std::marker::PhantomData;

use civica_core::access::{Actor, Filter, create_with_organization, with_organization_access};
use civica_core::entity::TenantEntity;
use civica_core::error::{CivicaError, CivicaResult};
use civica_core::models::{
    beneficiary::Beneficiary, budget::BudgetItem, document::Document,
    education::EducationRecord, intervention::Intervention, meal::Meal,
    notification::Notification, project::Project, resource::Resource,
    time_session::TimeSession, training::TrainingRecord,
};
use civica_core::repository::{PaginatedResult, Pagination, ScopedRepository};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ServiceError;

pub struct TenantService<E: TenantEntity, R: ScopedRepository<E>> {
    repo: R,
    _entity: PhantomData<fn() -> E>,
}

pub type BeneficiaryService<R> = TenantService<Beneficiary, R>;
pub type BudgetItemService<R> = TenantService<BudgetItem, R>;
pub type DocumentService<R> = TenantService<Document, R>;
pub type EducationRecordService<R> = TenantService<EducationRecord, R>;
pub type InterventionService<R> = TenantService<Intervention, R>;
pub type MealService<R> = TenantService<Meal, R>;
pub type NotificationService<R> = TenantService<Notification, R>;
pub type ProjectService<R> = TenantService<Project, R>;
pub type ResourceService<R> = TenantService<Resource, R>;
pub type TimeSessionService<R> = TenantService<TimeSession, R>;
pub type TrainingRecordService<R> = TenantService<TrainingRecord, R>;

fn not_found<E: TenantEntity>(id: Uuid) -> CivicaError {
    CivicaError::NotFound {
        entity: E::TABLE.into(),
        id: id.to_string(),
    }
}

impl<E: TenantEntity, R: ScopedRepository<E>> TenantService<E, R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            _entity: PhantomData,
        }
    }

    pub async fn create(&self, actor: Option<&Actor>, input: E::Create) -> CivicaResult<E> {
        let payload = create_with_organization(actor, &input)?;
        self.repo.create(payload).await
    }

    pub async fn get(&self, actor: Option<&Actor>, id: Uuid) -> CivicaResult<E> {
        let filter = with_organization_access(actor, Filter::by_id(id))?;
        self.repo.find_one(filter).await
    }

    pub async fn list(
        &self,
        actor: Option<&Actor>,
        filter: Filter,
        pagination: Pagination,
    ) -> CivicaResult<PaginatedResult<E>> {
        let filter = with_organization_access(actor, filter)?;
        self.repo.find(filter, pagination).await
    }

    /// Applies the fields set in `input` and returns the updated record.
    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: Uuid,
        input: E::Update,
    ) -> CivicaResult<E> {
        let filter = with_organization_access(actor, Filter::by_id(id))?;
        let patch = match serde_json::to_value(&input).map_err(ServiceError::from)? {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(ServiceError::EmptyUpdate.into()),
        };

        let updated = self.repo.update(filter, patch).await?;
        updated.into_iter().next().ok_or_else(|| not_found::<E>(id))
    }

    pub async fn delete(&self, actor: Option<&Actor>, id: Uuid) -> CivicaResult<()> {
        let filter = with_organization_access(actor, Filter::by_id(id))?;
        if self.repo.delete(filter).await? == 0 {
            return Err(not_found::<E>(id));
        }
        Ok(())
    }

    pub async fn count(&self, actor: Option<&Actor>, filter: Filter) -> CivicaResult<u64> {
        let filter = with_organization_access(actor, filter)?;
        self.repo.count(filter).await
    }
}
