//! Civica Service: organization-scoped business operations.
//!
//! Services are generic over the repository traits in `civica-core`, so
//! this crate has no dependency on the database crate.

pub mod backfill;
pub mod config;
pub mod error;
pub mod organization;
pub mod tenant;

pub use backfill::{BackfillReport, DefaultOrganizationBackfill};
pub use config::BackfillConfig;
pub use error::ServiceError;
pub use organization::OrganizationService;
pub use tenant::{
    BeneficiaryService, BudgetItemService, DocumentService, EducationRecordService,
    InterventionService, MealService, NotificationService, ProjectService, ResourceService,
    TenantService, TimeSessionService, TrainingRecordService,
};
