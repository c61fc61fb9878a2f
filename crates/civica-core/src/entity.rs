//! The contract every tenant-owned entity type implements.

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// How a date or time column is encoded in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// UTC instant with nanosecond precision.
    DateTime,
}

/// A domain record owned by exactly one organization.
///
/// Implementors describe their storage table and the domain columns
/// (everything except `id`, `organization_id`, `created_at` and
/// `updated_at`). Repositories use [`FIELDS`](Self::FIELDS) both to
/// project rows and to validate filter, payload and patch field names.
pub trait TenantEntity: DeserializeOwned + Send + Sync + 'static {
    /// Storage table name.
    const TABLE: &'static str;

    /// Domain columns.
    const FIELDS: &'static [&'static str];

    /// Columns of [`FIELDS`](Self::FIELDS) holding calendar dates.
    const DATE_FIELDS: &'static [&'static str] = &[];

    /// Columns of [`FIELDS`](Self::FIELDS) holding instants.
    const DATETIME_FIELDS: &'static [&'static str] = &[];

    /// Creation input. Must serialize to an object whose keys are a
    /// subset of [`FIELDS`](Self::FIELDS).
    type Create: Serialize + Send + Sync;

    /// Partial update. `None` fields must be skipped on serialization.
    type Update: Serialize + Send + Sync;

    fn id(&self) -> Uuid;

    fn organization_id(&self) -> Uuid;

    fn temporal_kind(field: &str) -> Option<Temporal>
    where
        Self: Sized,
    {
        if Self::DATE_FIELDS.contains(&field) {
            Some(Temporal::Date)
        } else if Self::DATETIME_FIELDS.contains(&field) {
            Some(Temporal::DateTime)
        } else {
            None
        }
    }
}

/// Implements [`TenantEntity`] for a model struct with `id` and
/// `organization_id` fields. `dates` and `datetimes` are optional and
/// must name entries of `fields`.
#[macro_export]
macro_rules! tenant_entity {
    (
        $ty:ty,
        table = $table:literal,
        create = $create:ty,
        update = $update:ty,
        fields = [$($field:literal),* $(,)?]
        $(, dates = [$($date:literal),* $(,)?])?
        $(, datetimes = [$($datetime:literal),* $(,)?])?
    ) => {
        impl $crate::entity::TenantEntity for $ty {
            const TABLE: &'static str = $table;
            const FIELDS: &'static [&'static str] = &[$($field),*];
            $(const DATE_FIELDS: &'static [&'static str] = &[$($date),*];)?
            $(const DATETIME_FIELDS: &'static [&'static str] = &[$($datetime),*];)?
            type Create = $create;
            type Update = $update;

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn organization_id(&self) -> ::uuid::Uuid {
                self.organization_id
            }
        }
    };
}
