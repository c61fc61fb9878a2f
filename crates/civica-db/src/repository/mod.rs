//! SurrealDB repository implementations.

mod organization;
mod scoped;
mod user;

pub use organization::SurrealOrganizationRepository;
pub use scoped::SurrealScopedRepository;
pub use user::SurrealUserRepository;
