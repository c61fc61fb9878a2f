//! Civica Core: domain models, the organization-scoped access guard,
//! and repository trait definitions shared by every other crate.

pub mod access;
pub mod classification;
pub mod entity;
pub mod error;
pub mod models;
pub mod repository;

pub use access::{
    Actor, Condition, Filter, Operator, ScopedFilter, ScopedPayload, create_with_organization,
    with_organization_access,
};
pub use entity::{Temporal, TenantEntity};
pub use error::{CivicaError, CivicaResult};
