//! Organization scoping for every tenant-owned entity type, run through
//! [`TenantService`] against in-memory SurrealDB.

use std::collections::BTreeSet;

use chrono::{NaiveDate, TimeZone, Utc};
use civica_core::access::Actor;
use civica_core::entity::TenantEntity;
use civica_core::error::CivicaError;
use civica_core::models::beneficiary::{Beneficiary, CreateBeneficiary, UpdateBeneficiary};
use civica_core::models::budget::{BudgetItem, BudgetKind, CreateBudgetItem, UpdateBudgetItem};
use civica_core::models::document::{CreateDocument, Document, UpdateDocument};
use civica_core::models::education::{
    CreateEducationRecord, EducationRecord, UpdateEducationRecord,
};
use civica_core::models::intervention::{
    CreateIntervention, Intervention, InterventionStatus, UpdateIntervention,
};
use civica_core::models::meal::{CreateMeal, Meal, MealType, UpdateMeal};
use civica_core::models::notification::{CreateNotification, Notification, UpdateNotification};
use civica_core::models::project::{CreateProject, Project, ProjectStatus, UpdateProject};
use civica_core::models::resource::{CreateResource, Resource, UpdateResource};
use civica_core::models::time_session::{CreateTimeSession, TimeSession, UpdateTimeSession};
use civica_core::models::training::{CreateTrainingRecord, TrainingRecord, UpdateTrainingRecord};
use civica_db::repository::SurrealScopedRepository;
use civica_service::TenantService;
use serde::Serialize;
use serde_json::Value;
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

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const BOOKKEEPING: &[&str] = &["id", "organization_id", "created_at", "updated_at"];

fn domain_columns(entity: &impl Serialize) -> BTreeSet<String> {
    match serde_json::to_value(entity).unwrap() {
        Value::Object(map) => map
            .into_iter()
            .map(|(k, _)| k)
            .filter(|k| !BOOKKEEPING.contains(&k.as_str()))
            .collect(),
        other => panic!("entity serialized to {other}"),
    }
}

/// Creates a record as one organization, then checks that a second
/// organization can neither read, change nor remove it, and that the
/// owner can still update and read it.
async fn assert_scoped<E>(db: &Surreal<Db>, input: E::Create, patch: E::Update)
where
    E: TenantEntity + Serialize + std::fmt::Debug,
    E::Update: Clone,
{
    let service: TenantService<E, SurrealScopedRepository<Db, E>> =
        TenantService::new(SurrealScopedRepository::new(db.clone()));
    let owner = actor_in(Uuid::new_v4());
    let outsider = actor_in(Uuid::new_v4());
    let table = E::TABLE;

    let created = service.create(Some(&owner), input).await.unwrap();
    assert_eq!(Some(created.organization_id()), owner.organization_id, "{table}");
    let expected: BTreeSet<String> = E::FIELDS.iter().map(|f| f.to_string()).collect();
    assert_eq!(domain_columns(&created), expected, "{table}: projected columns");

    let err = service.get(Some(&outsider), created.id()).await.unwrap_err();
    assert!(matches!(err, CivicaError::NotFound { .. }), "{table} get: {err:?}");

    let err = service
        .update(Some(&outsider), created.id(), patch.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, CivicaError::NotFound { .. }), "{table} update: {err:?}");

    let err = service.delete(Some(&outsider), created.id()).await.unwrap_err();
    assert!(matches!(err, CivicaError::NotFound { .. }), "{table} delete: {err:?}");

    let before = serde_json::to_value(&created).unwrap();
    let unchanged = service.get(Some(&owner), created.id()).await.unwrap();
    assert_eq!(
        serde_json::to_value(&unchanged).unwrap(),
        before,
        "{table}: foreign calls must leave the record untouched"
    );

    let updated = service.update(Some(&owner), created.id(), patch).await.unwrap();
    assert_eq!(updated.id(), created.id(), "{table}");
    assert_eq!(updated.organization_id(), created.organization_id(), "{table}");
    let fetched = service.get(Some(&owner), created.id()).await.unwrap();
    let fetched = serde_json::to_value(&fetched).unwrap();
    assert_ne!(fetched, before, "{table}: owner update did not apply");
    assert_eq!(fetched, serde_json::to_value(&updated).unwrap(), "{table}");
}

#[tokio::test]
async fn every_entity_type_is_scoped_to_its_organization() {
    let db = database().await;
    let someone = Uuid::new_v4();
    let started = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();

    assert_scoped::<Beneficiary>(
        &db,
        CreateBeneficiary {
            first_name: "Ada".into(),
            last_name: "Rossi".into(),
            birth_date: Some(date(2014, 3, 2)),
            ..Default::default()
        },
        UpdateBeneficiary {
            phone: Some("+39 055 000000".into()),
            ..Default::default()
        },
    )
    .await;

    assert_scoped::<BudgetItem>(
        &db,
        CreateBudgetItem {
            label: "Rent".into(),
            category: "Housing".into(),
            kind: BudgetKind::Expense,
            amount_cents: 90_000,
            currency: "EUR".into(),
            project_id: None,
            occurred_on: date(2026, 10, 1),
        },
        UpdateBudgetItem {
            amount_cents: Some(95_000),
            ..Default::default()
        },
    )
    .await;

    assert_scoped::<Document>(
        &db,
        CreateDocument {
            title: "Consent form".into(),
            file_name: "consent.pdf".into(),
            mime_type: "application/pdf".into(),
            size_bytes: 2048,
            storage_key: "docs/consent.pdf".into(),
            beneficiary_id: None,
        },
        UpdateDocument {
            title: Some("Signed consent form".into()),
            ..Default::default()
        },
    )
    .await;

    assert_scoped::<EducationRecord>(
        &db,
        CreateEducationRecord {
            beneficiary_id: someone,
            institution: "Scuola Dante".into(),
            level: "Primary".into(),
            subject: None,
            grade: None,
            start_date: date(2025, 9, 15),
            end_date: None,
        },
        UpdateEducationRecord {
            end_date: Some(date(2026, 6, 10)),
            ..Default::default()
        },
    )
    .await;

    assert_scoped::<Intervention>(
        &db,
        CreateIntervention {
            beneficiary_id: someone,
            kind: "Home visit".into(),
            description: "First contact".into(),
            status: InterventionStatus::Planned,
            scheduled_on: Some(date(2026, 10, 20)),
            staff_user_id: None,
        },
        UpdateIntervention {
            status: Some(InterventionStatus::Completed),
            ..Default::default()
        },
    )
    .await;

    assert_scoped::<Meal>(
        &db,
        CreateMeal {
            beneficiary_id: None,
            served_on: date(2026, 10, 19),
            meal_type: MealType::Lunch,
            portions: 40,
            notes: None,
        },
        UpdateMeal {
            portions: Some(42),
            ..Default::default()
        },
    )
    .await;

    assert_scoped::<Notification>(
        &db,
        CreateNotification {
            recipient_user_id: someone,
            title: "Shift change".into(),
            body: "Tomorrow starts at 9".into(),
            read: false,
        },
        UpdateNotification { read: Some(true) },
    )
    .await;

    assert_scoped::<Project>(
        &db,
        CreateProject {
            name: "Winter shelter".into(),
            description: None,
            status: ProjectStatus::Draft,
            start_date: Some(date(2026, 11, 1)),
            end_date: None,
            budget_cents: Some(250_000),
        },
        UpdateProject {
            status: Some(ProjectStatus::Active),
            ..Default::default()
        },
    )
    .await;

    assert_scoped::<Resource>(
        &db,
        CreateResource {
            name: "Blankets".into(),
            kind: "Supplies".into(),
            quantity: 120,
            location: None,
        },
        UpdateResource {
            quantity: Some(80),
            ..Default::default()
        },
    )
    .await;

    assert_scoped::<TimeSession>(
        &db,
        CreateTimeSession {
            user_id: someone,
            project_id: None,
            started_at: started,
            ended_at: None,
            note: None,
        },
        UpdateTimeSession {
            ended_at: Some(started + chrono::Duration::minutes(90)),
            ..Default::default()
        },
    )
    .await;

    assert_scoped::<TrainingRecord>(
        &db,
        CreateTrainingRecord {
            title: "First aid".into(),
            provider: "Red Cross".into(),
            participant_user_id: Some(someone),
            beneficiary_id: None,
            hours: 8,
            completed_on: None,
        },
        UpdateTrainingRecord {
            completed_on: Some(date(2026, 10, 18)),
            ..Default::default()
        },
    )
    .await;
}
