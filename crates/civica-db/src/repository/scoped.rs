//! SurrealDB implementation of [`ScopedRepository`] for every
//! [`TenantEntity`].
//!
//! Every statement renders the organization constraint first and the
//! caller's conditions after it, all joined with `AND`, inside the same
//! statement that reads, writes or deletes. Field names are checked
//! against the entity's field list before they reach the query text;
//! values are always bound as parameters.
//!
//! Date and datetime columns are written, and compared against, in a
//! fixed-width UTC text form, so ordering operators on them are
//! chronological.

use std::marker::PhantomData;

use civica_core::access::{
    ID_FIELD, ORGANIZATION_FIELD, Operator, ScopedFilter, ScopedPayload, validate_patch,
};
use chrono::{DateTime, NaiveDate, Utc};
use civica_core::entity::{Temporal, TenantEntity};
use civica_core::error::{CivicaError, CivicaResult};
use civica_core::repository::{PaginatedResult, Pagination, ScopedRepository};
use serde_json::{Map, Value};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

#[derive(Debug, SurrealValue)]
struct IdRow {
    record_id: String,
}

/// A rendered `WHERE` body and the parameters it references.
#[derive(Debug)]
struct WhereClause {
    sql: String,
    bindings: Vec<(String, Value)>,
}

fn operator_sql(operator: Operator) -> &'static str {
    match operator {
        Operator::Eq => "=",
        Operator::Ne => "!=",
        Operator::Gt => ">",
        Operator::Gte => ">=",
        Operator::Lt => "<",
        Operator::Lte => "<=",
        Operator::Contains => "CONTAINS",
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";

/// Rewrites a date or datetime string into its stored form. Non-string
/// values (`null` for an absent end date, for instance) pass through.
fn canonical_temporal(
    table: &str,
    field: &str,
    kind: Temporal,
    value: Value,
) -> CivicaResult<Value> {
    let Value::String(raw) = value else {
        return Ok(value);
    };
    let canonical = match kind {
        Temporal::Date => NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .map(|d| d.format(DATE_FORMAT).to_string())
            .map_err(|e| e.to_string()),
        Temporal::DateTime => DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc).format(DATETIME_FORMAT).to_string())
            .map_err(|e| e.to_string()),
    }
    .map_err(|e| {
        CivicaError::validation(format!("{table}.{field}: invalid value '{raw}': {e}"))
    })?;
    Ok(Value::String(canonical))
}

fn normalize_temporal<E: TenantEntity>(fields: &mut Map<String, Value>) -> CivicaResult<()> {
    for (field, value) in fields.iter_mut() {
        if let Some(kind) = E::temporal_kind(field) {
            *value = canonical_temporal(E::TABLE, field, kind, value.take())?;
        }
    }
    Ok(())
}

fn column_sql(field: &str) -> &str {
    if field == ID_FIELD {
        "meta::id(id)"
    } else {
        field
    }
}

fn where_clause<E: TenantEntity>(filter: &ScopedFilter) -> CivicaResult<WhereClause> {
    filter.validate_fields(E::FIELDS)?;

    let mut sql = format!("{ORGANIZATION_FIELD} = $organization_id");
    let mut bindings = vec![(
        "organization_id".to_string(),
        Value::String(filter.organization_id().to_string()),
    )];

    for (i, condition) in filter.conditions().iter().enumerate() {
        let param = format!("p{i}");
        sql.push_str(&format!(
            " AND {} {} ${param}",
            column_sql(&condition.field),
            operator_sql(condition.operator)
        ));
        let value = match E::temporal_kind(&condition.field) {
            Some(kind) if condition.operator != Operator::Contains => {
                canonical_temporal(E::TABLE, &condition.field, kind, condition.value.clone())?
            }
            _ => condition.value.clone(),
        };
        bindings.push((param, value));
    }

    Ok(WhereClause { sql, bindings })
}

/// Columns selected for an entity. Timestamps are formatted with a
/// fixed number of fractional digits so they decode as RFC 3339 and sort
/// as text.
fn projection<E: TenantEntity>() -> String {
    let mut columns = vec![
        "meta::id(id) AS record_id".to_string(),
        ORGANIZATION_FIELD.to_string(),
        format!("time::format(created_at, '{DATETIME_FORMAT}') AS created_at"),
        format!("time::format(updated_at, '{DATETIME_FORMAT}') AS updated_at"),
    ];
    columns.extend(E::FIELDS.iter().map(|f| f.to_string()));
    columns.join(", ")
}

fn decode<E: TenantEntity>(row: Value) -> Result<E, DbError> {
    let Value::Object(mut fields) = row else {
        return Err(DbError::decode(E::TABLE, "row is not an object"));
    };
    if let Some(record_id) = fields.remove("record_id") {
        fields.insert(ID_FIELD.to_string(), record_id);
    }
    serde_json::from_value(Value::Object(fields)).map_err(|e| DbError::decode(E::TABLE, e))
}

fn decode_all<E: TenantEntity>(rows: Vec<Value>) -> Result<Vec<E>, DbError> {
    rows.into_iter().map(decode::<E>).collect()
}

/// SurrealDB repository for one tenant-owned entity type.
pub struct SurrealScopedRepository<C: Connection, E> {
    db: Surreal<C>,
    _entity: PhantomData<fn() -> E>,
}

impl<C: Connection, E> Clone for SurrealScopedRepository<C, E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<C: Connection, E: TenantEntity> SurrealScopedRepository<C, E> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    async fn select(&self, clause: WhereClause, pagination: Pagination) -> CivicaResult<Vec<E>> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} \
             ORDER BY created_at ASC, record_id ASC \
             LIMIT $limit START $offset",
            projection::<E>(),
            E::TABLE,
            clause.sql
        );

        let mut builder = self
            .db
            .query(query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        for binding in clause.bindings {
            builder = builder.bind(binding);
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<Value> = result.take(0).map_err(DbError::from)?;
        Ok(decode_all(rows)?)
    }
}

impl<C: Connection, E: TenantEntity> ScopedRepository<E> for SurrealScopedRepository<C, E> {
    async fn create(&self, payload: ScopedPayload) -> CivicaResult<E> {
        payload.validate_fields(E::FIELDS)?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let organization_id = payload.organization_id();

        let mut content = payload.into_content();
        normalize_temporal::<E>(&mut content)?;

        let query = format!(
            "SELECT {} FROM (CREATE type::record('{}', $id) CONTENT $content)",
            projection::<E>(),
            E::TABLE
        );

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("content", Value::Object(content)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(E::TABLE, e))?;

        let rows: Vec<Value> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: E::TABLE.into(),
            id: id_str,
        })?;

        info!(
            entity = E::TABLE,
            id = %id,
            organization_id = %organization_id,
            "Created tenant-owned record"
        );

        Ok(decode(row)?)
    }

    async fn find(
        &self,
        filter: ScopedFilter,
        pagination: Pagination,
    ) -> CivicaResult<PaginatedResult<E>> {
        let clause = where_clause::<E>(&filter)?;

        let count_query = format!(
            "SELECT count() AS total FROM {} WHERE {} GROUP ALL",
            E::TABLE,
            clause.sql
        );
        let mut builder = self.db.query(count_query);
        for binding in clause.bindings.iter().cloned() {
            builder = builder.bind(binding);
        }
        let mut count_result = builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let items = self.select(clause, pagination).await?;

        debug!(
            entity = E::TABLE,
            organization_id = %filter.organization_id(),
            returned = items.len(),
            total,
            "Scoped find"
        );

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn find_one(&self, filter: ScopedFilter) -> CivicaResult<E> {
        let clause = where_clause::<E>(&filter)?;
        let rows = self
            .select(
                clause,
                Pagination {
                    offset: 0,
                    limit: 1,
                },
            )
            .await?;

        // A row owned by another organization is reported exactly like a
        // missing one.
        let entity = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: E::TABLE.into(),
            id: filter.describe(),
        })?;
        Ok(entity)
    }

    async fn update(
        &self,
        filter: ScopedFilter,
        mut patch: Map<String, Value>,
    ) -> CivicaResult<Vec<E>> {
        validate_patch(&patch, E::FIELDS)?;
        normalize_temporal::<E>(&mut patch)?;
        let clause = where_clause::<E>(&filter)?;

        let mut sets: Vec<String> = patch.keys().map(|k| format!("{k} = $set_{k}")).collect();
        sets.push("updated_at = time::now()".to_string());

        let query = format!(
            "SELECT {} FROM (UPDATE {} SET {} WHERE {})",
            projection::<E>(),
            E::TABLE,
            sets.join(", "),
            clause.sql
        );

        let mut builder = self.db.query(query);
        for binding in clause.bindings {
            builder = builder.bind(binding);
        }
        for (key, value) in patch {
            builder = builder.bind((format!("set_{key}"), value));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(E::TABLE, e))?;

        let rows: Vec<Value> = result.take(0).map_err(DbError::from)?;
        let items = decode_all::<E>(rows)?;

        debug!(
            entity = E::TABLE,
            organization_id = %filter.organization_id(),
            updated = items.len(),
            "Scoped update"
        );

        Ok(items)
    }

    async fn delete(&self, filter: ScopedFilter) -> CivicaResult<u64> {
        let clause = where_clause::<E>(&filter)?;

        let query = format!(
            "SELECT meta::id(id) AS record_id FROM \
             (DELETE {} WHERE {} RETURN BEFORE)",
            E::TABLE,
            clause.sql
        );

        let mut builder = self.db.query(query);
        for binding in clause.bindings {
            builder = builder.bind(binding);
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(E::TABLE, e))?;

        let rows: Vec<IdRow> = result.take(0).map_err(DbError::from)?;
        let deleted = rows.len() as u64;

        if deleted > 0 {
            info!(
                entity = E::TABLE,
                organization_id = %filter.organization_id(),
                deleted,
                ids = ?rows.iter().map(|r| r.record_id.as_str()).collect::<Vec<_>>(),
                "Deleted tenant-owned records"
            );
        }

        Ok(deleted)
    }

    async fn count(&self, filter: ScopedFilter) -> CivicaResult<u64> {
        let clause = where_clause::<E>(&filter)?;

        let query = format!(
            "SELECT count() AS total FROM {} WHERE {} GROUP ALL",
            E::TABLE,
            clause.sql
        );
        let mut builder = self.db.query(query);
        for binding in clause.bindings {
            builder = builder.bind(binding);
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
