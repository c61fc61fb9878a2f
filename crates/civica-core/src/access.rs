//! Organization-scoped access guard.
//!
//! Every read, write and creation of a tenant-owned entity goes through
//! one of two entry points:
//!
//! - [`with_organization_access`] turns a caller [`Filter`] into a
//!   [`ScopedFilter`] carrying the acting user's organization as a
//!   separate, non-overridable conjunct.
//! - [`create_with_organization`] turns a creation payload into a
//!   [`ScopedPayload`] whose `organization_id` is always the acting
//!   user's organization.
//!
//! Both scoped types have private fields and no public constructor, so a
//! repository that only accepts them cannot be handed an unscoped query.
//! Admin users get no bypass here: `is_admin` never widens the scope.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CivicaError, CivicaResult};
use crate::models::user::User;

/// Column holding the owning organization on every tenant-owned table.
pub const ORGANIZATION_FIELD: &str = "organization_id";

/// Pseudo-column addressing a record's own id in a [`Filter`].
pub const ID_FIELD: &str = "id";

/// The authenticated user on whose behalf an operation runs.
///
/// Resolved by the (external) session layer; the guard never looks up
/// identity itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    /// `None` until the user has been assigned to an organization.
    pub organization_id: Option<Uuid>,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(user_id: Uuid, organization_id: Option<Uuid>, is_admin: bool) -> Self {
        Self {
            user_id,
            organization_id,
            is_admin,
        }
    }

    /// The actor's organization, or `UnassignedOrganization`.
    pub fn organization(&self) -> CivicaResult<Uuid> {
        self.organization_id.ok_or(CivicaError::UnassignedOrganization)
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            organization_id: user.organization_id,
            is_admin: user.is_admin,
        }
    }
}

fn resolve_organization(actor: Option<&Actor>) -> CivicaResult<Uuid> {
    let actor = actor.ok_or(CivicaError::Unauthorized)?;
    actor.organization()
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Comparison operator of a single filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
}

/// One `field <op> value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

/// A caller-supplied conjunction of conditions. There is no disjunction,
/// so a condition can only narrow the result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches the single record with the given id.
    pub fn by_id(id: Uuid) -> Self {
        Self::new().eq(ID_FIELD, id.to_string())
    }

    pub fn with(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            operator,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Operator::Eq, value)
    }

    pub fn ne(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Operator::Ne, value)
    }

    pub fn gt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Operator::Gt, value)
    }

    pub fn gte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Operator::Gte, value)
    }

    pub fn lt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Operator::Lt, value)
    }

    pub fn lte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Operator::Lte, value)
    }

    pub fn contains(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Operator::Contains, value)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// A filter bound to exactly one organization.
///
/// Only [`with_organization_access`] can build one.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedFilter {
    organization_id: Uuid,
    filter: Filter,
}

impl ScopedFilter {
    pub fn organization_id(&self) -> Uuid {
        self.organization_id
    }

    /// Caller conditions, to be ANDed with the organization constraint.
    pub fn conditions(&self) -> &[Condition] {
        self.filter.conditions()
    }

    /// Rejects any condition whose field is not `id`, `organization_id`
    /// or one of `allowed`.
    pub fn validate_fields(&self, allowed: &[&str]) -> CivicaResult<()> {
        for condition in self.conditions() {
            let field = condition.field.as_str();
            if field != ID_FIELD && field != ORGANIZATION_FIELD && !allowed.contains(&field) {
                return Err(CivicaError::validation(format!(
                    "unknown filter field: {field}"
                )));
            }
        }
        Ok(())
    }

    /// Human-readable description of the caller conditions, used as the
    /// `id` of `NotFound` errors.
    pub fn describe(&self) -> String {
        if let [only] = self.conditions()
            && only.field == ID_FIELD
            && only.operator == Operator::Eq
        {
            return match &only.value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
        }
        self.conditions()
            .iter()
            .map(|c| format!("{}={}", c.field, c.value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Constrain `filter` to the acting user's organization.
///
/// Fails with `Unauthorized` without an actor and with
/// `UnassignedOrganization` when the actor has no organization. No
/// fallback organization is ever substituted.
pub fn with_organization_access(
    actor: Option<&Actor>,
    filter: Filter,
) -> CivicaResult<ScopedFilter> {
    let organization_id = resolve_organization(actor)?;
    debug!(
        organization_id = %organization_id,
        conditions = filter.conditions().len(),
        "Scoping query to organization"
    );
    Ok(ScopedFilter {
        organization_id,
        filter,
    })
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A creation payload stamped with the acting user's organization.
///
/// Only [`create_with_organization`] can build one.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedPayload {
    organization_id: Uuid,
    content: Map<String, Value>,
}

impl ScopedPayload {
    pub fn organization_id(&self) -> Uuid {
        self.organization_id
    }

    /// Payload fields, `organization_id` included.
    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    pub fn into_content(self) -> Map<String, Value> {
        self.content
    }

    /// Rejects an explicit `id` and any field outside `allowed`.
    pub fn validate_fields(&self, allowed: &[&str]) -> CivicaResult<()> {
        for key in self.content.keys() {
            if key == ORGANIZATION_FIELD {
                continue;
            }
            if !allowed.contains(&key.as_str()) {
                return Err(CivicaError::validation(format!(
                    "unknown payload field: {key}"
                )));
            }
        }
        Ok(())
    }
}

/// Stamp `payload` with the acting user's organization.
///
/// Any `organization_id` already present in the payload is overwritten.
/// The payload must serialize to a JSON object.
pub fn create_with_organization<T>(
    actor: Option<&Actor>,
    payload: &T,
) -> CivicaResult<ScopedPayload>
where
    T: Serialize + ?Sized,
{
    let organization_id = resolve_organization(actor)?;

    let value = serde_json::to_value(payload)
        .map_err(|e| CivicaError::validation(format!("payload is not serializable: {e}")))?;
    let Value::Object(mut content) = value else {
        return Err(CivicaError::validation("payload must be an object"));
    };

    let stamped = Value::String(organization_id.to_string());
    if let Some(previous) = content.insert(ORGANIZATION_FIELD.into(), stamped.clone())
        && !previous.is_null()
        && previous != stamped
    {
        warn!(
            organization_id = %organization_id,
            supplied = %previous,
            "Overriding caller-supplied organization_id on create"
        );
    }

    Ok(ScopedPayload {
        organization_id,
        content,
    })
}

/// Check an update patch: it may only touch `allowed` fields and never
/// `id` or `organization_id`.
pub fn validate_patch(patch: &Map<String, Value>, allowed: &[&str]) -> CivicaResult<()> {
    for key in patch.keys() {
        if key == ORGANIZATION_FIELD || key == ID_FIELD {
            return Err(CivicaError::validation(format!("{key} is immutable")));
        }
        if !allowed.contains(&key.as_str()) {
            return Err(CivicaError::validation(format!(
                "unknown update field: {key}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn actor(org: Option<Uuid>) -> Actor {
        Actor::new(Uuid::new_v4(), org, false)
    }

    #[test]
    fn missing_actor_is_unauthorized() {
        let err = with_organization_access(None, Filter::new()).unwrap_err();
        assert!(matches!(err, CivicaError::Unauthorized));

        let err = create_with_organization(None, &json!({})).unwrap_err();
        assert!(matches!(err, CivicaError::Unauthorized));
    }

    #[test]
    fn unassigned_actor_is_refused() {
        let user = actor(None);
        let err = with_organization_access(Some(&user), Filter::new()).unwrap_err();
        assert!(matches!(err, CivicaError::UnassignedOrganization));

        let err =
            create_with_organization(Some(&user), &json!({"first_name": "X"})).unwrap_err();
        assert!(matches!(err, CivicaError::UnassignedOrganization));
        assert!(err.is_access_denied());
    }

    #[test]
    fn scope_keeps_caller_conditions_and_adds_organization() {
        let org = Uuid::new_v4();
        let user = actor(Some(org));
        let foreign = Uuid::new_v4();

        let scoped = with_organization_access(
            Some(&user),
            Filter::new()
                .eq("status", "Active")
                .eq(ORGANIZATION_FIELD, foreign.to_string()),
        )
        .unwrap();

        assert_eq!(scoped.organization_id(), org);
        // A caller condition on organization_id stays a conjunct; it can
        // narrow the result but never replace the scope.
        assert_eq!(scoped.conditions().len(), 2);
        assert_eq!(scoped.conditions()[1].value, json!(foreign.to_string()));
    }

    #[test]
    fn admin_is_scoped_to_own_organization() {
        let org = Uuid::new_v4();
        let admin = Actor::new(Uuid::new_v4(), Some(org), true);
        let scoped = with_organization_access(Some(&admin), Filter::new()).unwrap();
        assert_eq!(scoped.organization_id(), org);

        let unassigned_admin = Actor::new(Uuid::new_v4(), None, true);
        let err = with_organization_access(Some(&unassigned_admin), Filter::new()).unwrap_err();
        assert!(matches!(err, CivicaError::UnassignedOrganization));
    }

    #[test]
    fn create_overwrites_foreign_organization() {
        let org = Uuid::new_v4();
        let user = actor(Some(org));
        let payload = json!({
            "organization_id": Uuid::new_v4().to_string(),
            "first_name": "X",
        });

        let scoped = create_with_organization(Some(&user), &payload).unwrap();
        assert_eq!(scoped.organization_id(), org);
        assert_eq!(scoped.content()["organization_id"], json!(org.to_string()));
        assert_eq!(scoped.content()["first_name"], json!("X"));
    }

    #[test]
    fn create_rejects_non_object_payload() {
        let user = actor(Some(Uuid::new_v4()));
        let err = create_with_organization(Some(&user), &json!(["a", "b"])).unwrap_err();
        assert!(matches!(err, CivicaError::Validation { .. }));
    }

    #[test]
    fn field_validation() {
        let user = actor(Some(Uuid::new_v4()));
        let allowed = ["first_name", "last_name"];

        let ok = with_organization_access(
            Some(&user),
            Filter::by_id(Uuid::new_v4()).eq("first_name", "X"),
        )
        .unwrap();
        assert!(ok.validate_fields(&allowed).is_ok());

        let bad = with_organization_access(
            Some(&user),
            Filter::new().eq("1 = 1 OR organization_id", "x"),
        )
        .unwrap();
        assert!(bad.validate_fields(&allowed).is_err());

        let payload = create_with_organization(Some(&user), &json!({"id": "x"})).unwrap();
        assert!(payload.validate_fields(&allowed).is_err());
    }

    #[test]
    fn patch_cannot_move_records() {
        let allowed = ["first_name"];
        let patch = json!({"organization_id": Uuid::new_v4().to_string()});
        let Value::Object(patch) = patch else {
            unreachable!()
        };
        assert!(validate_patch(&patch, &allowed).is_err());

        let patch = json!({"first_name": "Y"});
        let Value::Object(patch) = patch else {
            unreachable!()
        };
        assert!(validate_patch(&patch, &allowed).is_ok());
    }

    #[test]
    fn describe_single_id_filter() {
        let user = actor(Some(Uuid::new_v4()));
        let id = Uuid::new_v4();
        let scoped = with_organization_access(Some(&user), Filter::by_id(id)).unwrap();
        assert_eq!(scoped.describe(), id.to_string());
    }
}
