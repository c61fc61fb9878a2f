//! SurrealDB implementation of [`OrganizationRepository`].

use chrono::{DateTime, Utc};
use civica_core::error::CivicaResult;
use civica_core::models::organization::{
    CreateOrganization, Organization, OrganizationStatus, Quotas, SubscriptionPlan,
    UpdateOrganization,
};
use civica_core::repository::{OrganizationRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    slug: String,
    name: String,
    email: String,
    status: String,
    plan: String,
    max_users: u32,
    max_beneficiaries: u32,
    max_storage: u64,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrganizationRowWithId {
    record_id: String,
    slug: String,
    name: String,
    email: String,
    status: String,
    plan: String,
    max_users: u32,
    max_beneficiaries: u32,
    max_storage: u64,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<OrganizationStatus, DbError> {
    match s {
        "Active" => Ok(OrganizationStatus::Active),
        "Suspended" => Ok(OrganizationStatus::Suspended),
        "Archived" => Ok(OrganizationStatus::Archived),
        other => Err(DbError::decode(
            "organization",
            format!("unknown status: {other}"),
        )),
    }
}

fn status_to_string(s: OrganizationStatus) -> &'static str {
    match s {
        OrganizationStatus::Active => "Active",
        OrganizationStatus::Suspended => "Suspended",
        OrganizationStatus::Archived => "Archived",
    }
}

fn parse_plan(s: &str) -> Result<SubscriptionPlan, DbError> {
    match s {
        "Free" => Ok(SubscriptionPlan::Free),
        "Starter" => Ok(SubscriptionPlan::Starter),
        "Professional" => Ok(SubscriptionPlan::Professional),
        "Enterprise" => Ok(SubscriptionPlan::Enterprise),
        other => Err(DbError::decode("organization", format!("unknown plan: {other}"))),
    }
}

fn plan_to_string(p: SubscriptionPlan) -> &'static str {
    match p {
        SubscriptionPlan::Free => "Free",
        SubscriptionPlan::Starter => "Starter",
        SubscriptionPlan::Professional => "Professional",
        SubscriptionPlan::Enterprise => "Enterprise",
    }
}

impl OrganizationRow {
    fn into_organization(self, id: Uuid) -> Result<Organization, DbError> {
        Ok(Organization {
            id,
            slug: self.slug,
            name: self.name,
            email: self.email,
            status: parse_status(&self.status)?,
            plan: parse_plan(&self.plan)?,
            quotas: Quotas {
                max_users: self.max_users,
                max_beneficiaries: self.max_beneficiaries,
                max_storage: self.max_storage,
            },
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl OrganizationRowWithId {
    fn try_into_organization(self) -> Result<Organization, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::decode("organization", format!("invalid UUID: {e}")))?;
        OrganizationRow {
            slug: self.slug,
            name: self.name,
            email: self.email,
            status: self.status,
            plan: self.plan,
            max_users: self.max_users,
            max_beneficiaries: self.max_beneficiaries,
            max_storage: self.max_storage,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_organization(id)
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Organization repository.
#[derive(Clone)]
pub struct SurrealOrganizationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrganizationRepository for SurrealOrganizationRepository<C> {
    async fn create(&self, input: CreateOrganization) -> CivicaResult<Organization> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let quotas = input.quotas.unwrap_or_default();
        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('organization', $id) SET \
                 slug = $slug, name = $name, email = $email, \
                 status = 'Active', plan = $plan, \
                 max_users = $max_users, \
                 max_beneficiaries = $max_beneficiaries, \
                 max_storage = $max_storage, \
                 metadata = $metadata",
            )
            .bind(("id", id_str.clone()))
            .bind(("slug", input.slug.clone()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("plan", plan_to_string(input.plan).to_string()))
            .bind(("max_users", quotas.max_users))
            .bind(("max_beneficiaries", quotas.max_beneficiaries))
            .bind(("max_storage", quotas.max_storage))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("organization", e))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        info!(organization_id = %id, slug = %input.slug, "Organization created");

        Ok(row.into_organization(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CivicaResult<Organization> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('organization', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.into_organization(id)?)
    }

    async fn get_by_slug(&self, slug: &str) -> CivicaResult<Organization> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM organization WHERE slug = $slug",
            )
            .bind(("slug", slug.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: format!("slug={slug}"),
        })?;

        Ok(row.try_into_organization()?)
    }

    async fn update(&self, id: Uuid, input: UpdateOrganization) -> CivicaResult<Organization> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.plan.is_some() {
            sets.push("plan = $plan");
        }
        if input.quotas.is_some() {
            sets.push("max_users = $max_users");
            sets.push("max_beneficiaries = $max_beneficiaries");
            sets.push("max_storage = $max_storage");
        }
        if input.metadata.is_some() {
            sets.push("metadata = $metadata");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('organization', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }
        if let Some(plan) = input.plan {
            builder = builder.bind(("plan", plan_to_string(plan).to_string()));
        }
        if let Some(quotas) = input.quotas {
            builder = builder
                .bind(("max_users", quotas.max_users))
                .bind(("max_beneficiaries", quotas.max_beneficiaries))
                .bind(("max_storage", quotas.max_storage));
        }
        if let Some(metadata) = input.metadata {
            builder = builder.bind(("metadata", metadata));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("organization", e))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.into_organization(id)?)
    }

    async fn list(&self, pagination: Pagination) -> CivicaResult<PaginatedResult<Organization>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM organization GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM organization \
                 ORDER BY created_at ASC, record_id ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_organization())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
