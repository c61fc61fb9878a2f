//! Schema definitions and migration runner for SurrealDB.
//!
//! Global tables (organization, user) use SCHEMAFULL mode. Tenant-owned
//! tables are SCHEMALESS apart from their typed `organization_id` and
//! timestamp columns. UUIDs are stored as strings. Enums are stored as
//! strings, with ASSERT constraints on the global tables.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "tenant_owned_tables",
        sql: SCHEMA_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1: organizations and users
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations (global scope, never hard-deleted)
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD slug ON TABLE organization TYPE string;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD email ON TABLE organization TYPE string;
DEFINE FIELD status ON TABLE organization TYPE string \
    ASSERT $value IN ['Active', 'Suspended', 'Archived'];
DEFINE FIELD plan ON TABLE organization TYPE string \
    ASSERT $value IN ['Free', 'Starter', 'Professional', 'Enterprise'];
DEFINE FIELD max_users ON TABLE organization TYPE int;
DEFINE FIELD max_beneficiaries ON TABLE organization TYPE int;
DEFINE FIELD max_storage ON TABLE organization TYPE int;
DEFINE FIELD metadata ON TABLE organization TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_organization_slug ON TABLE organization \
    COLUMNS slug UNIQUE;

-- =======================================================================
-- Users (global scope, optionally assigned to an organization)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD organization_id ON TABLE user TYPE option<string>;
DEFINE FIELD is_admin ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD status ON TABLE user TYPE string \
    ASSERT $value IN ['Active', 'Inactive'];
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_organization ON TABLE user COLUMNS organization_id;
";

// -----------------------------------------------------------------------
// Schema v2: tenant-owned entities
//
// Domain columns are validated by the repositories against each entity's
// field list; the tables themselves only enforce the ownership column and
// timestamps.
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
DEFINE TABLE beneficiary SCHEMALESS;
DEFINE FIELD organization_id ON TABLE beneficiary TYPE string;
DEFINE FIELD created_at ON TABLE beneficiary TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE beneficiary TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_beneficiary_org ON TABLE beneficiary \
    COLUMNS organization_id;

DEFINE TABLE budget_item SCHEMALESS;
DEFINE FIELD organization_id ON TABLE budget_item TYPE string;
DEFINE FIELD created_at ON TABLE budget_item TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE budget_item TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_budget_item_org ON TABLE budget_item \
    COLUMNS organization_id;

DEFINE TABLE document SCHEMALESS;
DEFINE FIELD organization_id ON TABLE document TYPE string;
DEFINE FIELD created_at ON TABLE document TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE document TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_document_org ON TABLE document \
    COLUMNS organization_id;

DEFINE TABLE education_record SCHEMALESS;
DEFINE FIELD organization_id ON TABLE education_record TYPE string;
DEFINE FIELD created_at ON TABLE education_record TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE education_record TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_education_record_org ON TABLE education_record \
    COLUMNS organization_id;

DEFINE TABLE intervention SCHEMALESS;
DEFINE FIELD organization_id ON TABLE intervention TYPE string;
DEFINE FIELD created_at ON TABLE intervention TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE intervention TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_intervention_org ON TABLE intervention \
    COLUMNS organization_id;

DEFINE TABLE meal SCHEMALESS;
DEFINE FIELD organization_id ON TABLE meal TYPE string;
DEFINE FIELD created_at ON TABLE meal TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE meal TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_meal_org ON TABLE meal COLUMNS organization_id;

DEFINE TABLE notification SCHEMALESS;
DEFINE FIELD organization_id ON TABLE notification TYPE string;
DEFINE FIELD created_at ON TABLE notification TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE notification TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_notification_org ON TABLE notification \
    COLUMNS organization_id;

DEFINE TABLE project SCHEMALESS;
DEFINE FIELD organization_id ON TABLE project TYPE string;
DEFINE FIELD created_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_project_org ON TABLE project COLUMNS organization_id;

DEFINE TABLE resource SCHEMALESS;
DEFINE FIELD organization_id ON TABLE resource TYPE string;
DEFINE FIELD created_at ON TABLE resource TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE resource TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_resource_org ON TABLE resource COLUMNS organization_id;

DEFINE TABLE time_session SCHEMALESS;
DEFINE FIELD organization_id ON TABLE time_session TYPE string;
DEFINE FIELD created_at ON TABLE time_session TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE time_session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_time_session_org ON TABLE time_session \
    COLUMNS organization_id;

DEFINE TABLE training_record SCHEMALESS;
DEFINE FIELD organization_id ON TABLE training_record TYPE string;
DEFINE FIELD created_at ON TABLE training_record TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE training_record TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_training_record_org ON TABLE training_record \
    COLUMNS organization_id;
";

/// Tables holding tenant-owned entities. Each carries an
/// `organization_id` column.
pub const TENANT_TABLES: &[&str] = &[
    "beneficiary",
    "budget_item",
    "document",
    "education_record",
    "intervention",
    "meal",
    "notification",
    "project",
    "resource",
    "time_session",
    "training_record",
];

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client and
/// return how many were applied.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<usize, DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
            applied += 1;
        }
    }

    if applied == 0 {
        info!(version = current_version, "Schema is up to date");
    }

    Ok(applied)
}

/// Latest schema version known to this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}
