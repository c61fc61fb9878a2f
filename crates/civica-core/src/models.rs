//! Domain models for Civica.
//!
//! `organization` and `user` are global; every other module is a
//! tenant-owned entity implementing [`TenantEntity`](crate::TenantEntity).

pub mod beneficiary;
pub mod budget;
pub mod document;
pub mod education;
pub mod intervention;
pub mod meal;
pub mod notification;
pub mod organization;
pub mod project;
pub mod resource;
pub mod time_session;
pub mod training;
pub mod user;
