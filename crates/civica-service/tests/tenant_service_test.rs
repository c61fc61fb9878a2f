//! Integration tests for tenant-owned entity services using in-memory
//! SurrealDB.

use chrono::NaiveDate;
use civica_core::access::{Actor, Filter};
use civica_core::error::CivicaError;
use civica_core::models::document::{CreateDocument, Document};
use civica_core::models::project::{CreateProject, Project, ProjectStatus, UpdateProject};
use civica_core::repository::Pagination;
use civica_db::repository::SurrealScopedRepository;
use civica_service::{DocumentService, ProjectService};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn database() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    civica_db::run_migrations(&db).await.unwrap();
    db
}

fn actor_in(organization_id: Uuid) -> Actor {
    Actor::new(Uuid::new_v4(), Some(organization_id), false)
}

fn project(name: &str) -> CreateProject {
    CreateProject {
        name: name.into(),
        description: None,
        status: ProjectStatus::Draft,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1),
        end_date: None,
        budget_cents: Some(250_000),
    }
}

#[tokio::test]
async fn project_lifecycle_within_organization() {
    let service: ProjectService<SurrealScopedRepository<Db, Project>> =
        ProjectService::new(SurrealScopedRepository::new(database().await));
    let actor = actor_in(Uuid::new_v4());

    let created = service.create(Some(&actor), project("Winter shelter")).await.unwrap();
    assert_eq!(created.organization_id, actor.organization_id.unwrap());
    assert_eq!(created.status, ProjectStatus::Draft);

    let updated = service
        .update(
            Some(&actor),
            created.id,
            UpdateProject {
                status: Some(ProjectStatus::Active),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, ProjectStatus::Active);
    assert_eq!(updated.name, "Winter shelter");

    let fetched = service.get(Some(&actor), created.id).await.unwrap();
    assert_eq!(fetched.status, ProjectStatus::Active);

    service.delete(Some(&actor), created.id).await.unwrap();
    let err = service.get(Some(&actor), created.id).await.unwrap_err();
    assert!(matches!(err, CivicaError::NotFound { .. }));
}

#[tokio::test]
async fn other_organization_sees_not_found() {
    let service: ProjectService<SurrealScopedRepository<Db, Project>> =
        ProjectService::new(SurrealScopedRepository::new(database().await));
    let owner = actor_in(Uuid::new_v4());
    let outsider = actor_in(Uuid::new_v4());

    let created = service.create(Some(&owner), project("Food drive")).await.unwrap();

    let err = service.get(Some(&outsider), created.id).await.unwrap_err();
    assert!(matches!(err, CivicaError::NotFound { .. }));

    let err = service
        .update(
            Some(&outsider),
            created.id,
            UpdateProject {
                name: Some("Taken over".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CivicaError::NotFound { .. }));

    let err = service.delete(Some(&outsider), created.id).await.unwrap_err();
    assert!(matches!(err, CivicaError::NotFound { .. }));

    let intact = service.get(Some(&owner), created.id).await.unwrap();
    assert_eq!(intact.name, "Food drive");

    let missing = service.get(Some(&owner), Uuid::new_v4()).await.unwrap_err();
    assert_eq!(
        std::mem::discriminant(&err),
        std::mem::discriminant(&missing)
    );
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let service: ProjectService<SurrealScopedRepository<Db, Project>> =
        ProjectService::new(SurrealScopedRepository::new(database().await));
    let actor = actor_in(Uuid::new_v4());
    let created = service.create(Some(&actor), project("Clinic")).await.unwrap();

    let err = service
        .update(Some(&actor), created.id, UpdateProject::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CivicaError::Validation { .. }));
}

#[tokio::test]
async fn unassigned_user_cannot_list_documents() {
    let service: DocumentService<SurrealScopedRepository<Db, Document>> =
        DocumentService::new(SurrealScopedRepository::new(database().await));
    let unassigned = Actor::new(Uuid::new_v4(), None, false);

    let err = service
        .list(Some(&unassigned), Filter::new(), Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CivicaError::UnassignedOrganization));

    let err = service
        .list(None, Filter::new(), Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CivicaError::Unauthorized));
}

#[tokio::test]
async fn admin_lists_only_own_documents() {
    let service: DocumentService<SurrealScopedRepository<Db, Document>> =
        DocumentService::new(SurrealScopedRepository::new(database().await));
    let north = Uuid::new_v4();
    let south = Uuid::new_v4();
    let admin = Actor::new(Uuid::new_v4(), Some(north), true);
    let south_staff = actor_in(south);

    for (actor, title) in [(&admin, "intake form"), (&south_staff, "south report")] {
        service
            .create(
                Some(actor),
                CreateDocument {
                    title: title.into(),
                    file_name: format!("{title}.pdf"),
                    mime_type: "application/pdf".into(),
                    size_bytes: 1024,
                    storage_key: format!("docs/{}", Uuid::new_v4()),
                    beneficiary_id: None,
                },
            )
            .await
            .unwrap();
    }

    let page = service
        .list(Some(&admin), Filter::new(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "intake form");
    assert_eq!(page.items[0].organization_id, north);

    assert_eq!(service.count(Some(&south_staff), Filter::new()).await.unwrap(), 1);
}
