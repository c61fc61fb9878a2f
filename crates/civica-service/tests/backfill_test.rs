//! Integration tests for the default-organization backfill using
//! in-memory SurrealDB.

use std::sync::atomic::{AtomicBool, Ordering};

use civica_core::error::{CivicaError, CivicaResult};
use civica_core::models::organization::{CreateOrganization, SubscriptionPlan};
use civica_core::models::user::{CreateUser, UpdateUser, User};
use civica_core::repository::{
    Assignment, OrganizationRepository, PaginatedResult, Pagination, UserRepository,
};
use civica_db::repository::{SurrealOrganizationRepository, SurrealUserRepository};
use civica_service::{BackfillConfig, DefaultOrganizationBackfill};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn database() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    civica_db::run_migrations(&db).await.unwrap();
    db
}

fn backfill(
    db: &Surreal<Db>,
    config: BackfillConfig,
) -> DefaultOrganizationBackfill<SurrealOrganizationRepository<Db>, SurrealUserRepository<Db>> {
    DefaultOrganizationBackfill::new(
        SurrealOrganizationRepository::new(db.clone()),
        SurrealUserRepository::new(db.clone()),
        config,
    )
}

async fn add_user(db: &Surreal<Db>, email: &str, organization_id: Option<Uuid>) -> Uuid {
    SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            email: email.into(),
            name: email.into(),
            organization_id,
            is_admin: false,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn backfill_assigns_every_unassigned_user() {
    let db = database().await;
    let config = BackfillConfig {
        batch_size: 2,
        ..Default::default()
    };
    for i in 0..5 {
        add_user(&db, &format!("user{i}@example.org"), None).await;
    }

    let report = backfill(&db, config).run().await.unwrap();
    assert!(report.organization_created);
    assert_eq!(report.assigned, 5);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.failed, 0);

    let users = SurrealUserRepository::new(db.clone());
    let remaining = users.list_unassigned(Pagination::default()).await.unwrap();
    assert_eq!(remaining.total, 0);

    let members = users
        .list_by_organization(report.organization_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(members.total, 5);
}

#[tokio::test]
async fn second_run_changes_nothing() {
    let db = database().await;
    add_user(&db, "a@example.org", None).await;
    add_user(&db, "b@example.org", None).await;

    let first = backfill(&db, BackfillConfig::default()).run().await.unwrap();
    assert!(first.organization_created);
    assert_eq!(first.assigned, 2);

    let second = backfill(&db, BackfillConfig::default()).run().await.unwrap();
    assert!(!second.organization_created);
    assert_eq!(second.organization_id, first.organization_id);
    assert_eq!(second.assigned, 0);
    assert_eq!(second.failed, 0);

    let orgs = SurrealOrganizationRepository::new(db.clone())
        .list(Pagination::default())
        .await
        .unwrap();
    assert_eq!(orgs.total, 1);
}

#[tokio::test]
async fn existing_default_organization_is_reused() {
    let db = database().await;
    let existing = SurrealOrganizationRepository::new(db.clone())
        .create(CreateOrganization {
            slug: "default".into(),
            name: "Pre-existing".into(),
            email: "ops@example.org".into(),
            plan: SubscriptionPlan::Enterprise,
            quotas: None,
            metadata: None,
        })
        .await
        .unwrap();
    add_user(&db, "a@example.org", None).await;

    let report = backfill(&db, BackfillConfig::default()).run().await.unwrap();
    assert!(!report.organization_created);
    assert_eq!(report.organization_id, existing.id);
    assert_eq!(report.assigned, 1);
}

#[tokio::test]
async fn assigned_users_keep_their_organization() {
    let db = database().await;
    let other = SurrealOrganizationRepository::new(db.clone())
        .create(CreateOrganization {
            slug: "other".into(),
            name: "Other".into(),
            email: "other@example.org".into(),
            plan: SubscriptionPlan::Free,
            quotas: None,
            metadata: None,
        })
        .await
        .unwrap();
    let member = add_user(&db, "member@example.org", Some(other.id)).await;
    add_user(&db, "loose@example.org", None).await;

    let report = backfill(&db, BackfillConfig::default()).run().await.unwrap();
    assert_eq!(report.assigned, 1);

    let user = SurrealUserRepository::new(db.clone())
        .get_by_id(member)
        .await
        .unwrap();
    assert_eq!(user.organization_id, Some(other.id));
}

#[tokio::test]
async fn zero_batch_size_is_rejected() {
    let db = database().await;
    let config = BackfillConfig {
        batch_size: 0,
        ..Default::default()
    };
    let err = backfill(&db, config).run().await.unwrap_err();
    assert!(matches!(err, CivicaError::Validation { .. }));
}

/// User repository that, on its first listing, assigns the oldest listed
/// user to `organization_id` before returning the page. Models another
/// process assigning the same user while a batch is in flight.
struct ConcurrentlyAssigning {
    inner: SurrealUserRepository<Db>,
    organization_id: Uuid,
    fired: AtomicBool,
}

impl UserRepository for ConcurrentlyAssigning {
    async fn create(&self, input: CreateUser) -> CivicaResult<User> {
        self.inner.create(input).await
    }

    async fn get_by_id(&self, id: Uuid) -> CivicaResult<User> {
        self.inner.get_by_id(id).await
    }

    async fn get_by_email(&self, email: &str) -> CivicaResult<User> {
        self.inner.get_by_email(email).await
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> CivicaResult<User> {
        self.inner.update(id, input).await
    }

    async fn assign_organization(
        &self,
        id: Uuid,
        organization_id: Uuid,
    ) -> CivicaResult<Assignment> {
        self.inner.assign_organization(id, organization_id).await
    }

    async fn list_unassigned(&self, pagination: Pagination) -> CivicaResult<PaginatedResult<User>> {
        let page = self.inner.list_unassigned(pagination).await?;
        if let Some(first) = page.items.first() {
            if !self.fired.swap(true, Ordering::SeqCst) {
                self.inner
                    .assign_organization(first.id, self.organization_id)
                    .await?;
            }
        }
        Ok(page)
    }

    async fn list_by_organization(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> CivicaResult<PaginatedResult<User>> {
        self.inner
            .list_by_organization(organization_id, pagination)
            .await
    }
}

#[tokio::test]
async fn users_assigned_mid_run_count_as_skipped() {
    let db = database().await;
    let default_org = SurrealOrganizationRepository::new(db.clone())
        .create(CreateOrganization {
            slug: "default".into(),
            name: "Default".into(),
            email: "ops@example.org".into(),
            plan: SubscriptionPlan::Free,
            quotas: None,
            metadata: None,
        })
        .await
        .unwrap();
    for i in 0..3 {
        add_user(&db, &format!("user{i}@example.org"), None).await;
    }

    let users = ConcurrentlyAssigning {
        inner: SurrealUserRepository::new(db.clone()),
        organization_id: default_org.id,
        fired: AtomicBool::new(false),
    };
    let report = DefaultOrganizationBackfill::new(
        SurrealOrganizationRepository::new(db.clone()),
        users,
        BackfillConfig::default(),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.organization_id, default_org.id);
    assert_eq!(report.assigned, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);

    let members = SurrealUserRepository::new(db.clone())
        .list_by_organization(default_org.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(members.total, 3);
}
