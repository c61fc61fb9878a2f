//! SurrealDB implementation of [`UserRepository`].
//!
//! Users live outside any organization until assigned. Assignment is a
//! conditional `UPDATE ... WHERE organization_id = NONE`, so a concurrent
//! second assignment can never overwrite the first.

use chrono::{DateTime, Utc};
use civica_core::error::{CivicaError, CivicaResult};
use civica_core::models::user::{CreateUser, UpdateUser, User, UserStatus};
use civica_core::repository::{Assignment, PaginatedResult, Pagination, UserRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    email: String,
    name: String,
    organization_id: Option<String>,
    is_admin: bool,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    email: String,
    name: String,
    organization_id: Option<String>,
    is_admin: bool,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<UserStatus, DbError> {
    match s {
        "Active" => Ok(UserStatus::Active),
        "Inactive" => Ok(UserStatus::Inactive),
        other => Err(DbError::decode("user", format!("unknown status: {other}"))),
    }
}

fn status_to_string(s: UserStatus) -> &'static str {
    match s {
        UserStatus::Active => "Active",
        UserStatus::Inactive => "Inactive",
    }
}

fn parse_org(raw: Option<String>) -> Result<Option<Uuid>, DbError> {
    raw.map(|s| Uuid::parse_str(&s))
        .transpose()
        .map_err(|e| DbError::decode("user", format!("invalid organization UUID: {e}")))
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            email: self.email,
            name: self.name,
            organization_id: parse_org(self.organization_id)?,
            is_admin: self.is_admin,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::decode("user", format!("invalid UUID: {e}")))?;
        Ok(User {
            id,
            email: self.email,
            name: self.name,
            organization_id: parse_org(self.organization_id)?,
            is_admin: self.is_admin,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        condition: &str,
        organization_id: Option<String>,
        pagination: Pagination,
    ) -> CivicaResult<PaginatedResult<User>> {
        let count_query = format!("SELECT count() AS total FROM user WHERE {condition} GROUP ALL");
        let mut count_result = self
            .db
            .query(count_query)
            .bind(("organization_id", organization_id.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM user \
             WHERE {condition} \
             ORDER BY created_at ASC, record_id ASC \
             LIMIT $limit START $offset"
        );
        let mut result = self
            .db
            .query(query)
            .bind(("organization_id", organization_id))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> CivicaResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 email = $email, name = $name, \
                 organization_id = $organization_id, \
                 is_admin = $is_admin, \
                 status = 'Active'",
            )
            .bind(("id", id_str.clone()))
            .bind(("email", input.email))
            .bind(("name", input.name))
            .bind((
                "organization_id",
                input.organization_id.map(|o| o.to_string()),
            ))
            .bind(("is_admin", input.is_admin))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CivicaResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_email(&self, email: &str) -> CivicaResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> CivicaResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.is_admin.is_some() {
            sets.push("is_admin = $is_admin");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(is_admin) = input.is_admin {
            builder = builder.bind(("is_admin", is_admin));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn assign_organization(
        &self,
        id: Uuid,
        organization_id: Uuid,
    ) -> CivicaResult<Assignment> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 organization_id = $organization_id, \
                 updated_at = time::now() \
                 WHERE organization_id = NONE",
            )
            .bind(("id", id_str))
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if let Some(row) = rows.into_iter().next() {
            info!(
                user_id = %id,
                organization_id = %organization_id,
                "User assigned to organization"
            );
            return Ok(Assignment::Assigned(row.into_user(id)?));
        }

        // Nothing updated: either the user is missing or already assigned.
        let user = self.get_by_id(id).await?;
        match user.organization_id {
            Some(current) if current == organization_id => Ok(Assignment::Unchanged(user)),
            Some(current) => {
                warn!(
                    user_id = %id,
                    current = %current,
                    requested = %organization_id,
                    "Refusing to reassign user to another organization"
                );
                Err(CivicaError::AlreadyAssigned { user_id: id })
            }
            None => Err(CivicaError::Internal(format!(
                "assignment of user {id} did not apply"
            ))),
        }
    }

    async fn list_unassigned(&self, pagination: Pagination) -> CivicaResult<PaginatedResult<User>> {
        self.list_where("organization_id = NONE", None, pagination).await
    }

    async fn list_by_organization(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> CivicaResult<PaginatedResult<User>> {
        self.list_where(
            "organization_id = $organization_id",
            Some(organization_id.to_string()),
            pagination,
        )
        .await
    }
}
