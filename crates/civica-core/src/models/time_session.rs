//! Time tracking sessions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSession {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    /// `None` while the session is running.
    pub ended_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeSession {
    pub fn is_running(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Elapsed time, measured up to `now` for a running session.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        let end = self.ended_at.unwrap_or(now);
        (end - self.started_at).max(Duration::zero())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimeSession {
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTimeSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

crate::tenant_entity!(
    TimeSession,
    table = "time_session",
    create = CreateTimeSession,
    update = UpdateTimeSession,
    fields = ["user_id", "project_id", "started_at", "ended_at", "note"],
    datetimes = ["started_at", "ended_at"]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_session_duration_uses_now() {
        let started_at = Utc::now() - Duration::minutes(90);
        let session = TimeSession {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            project_id: None,
            started_at,
            ended_at: None,
            note: None,
            created_at: started_at,
            updated_at: started_at,
        };
        assert!(session.is_running());
        assert_eq!(
            session.duration(started_at + Duration::minutes(90)),
            Duration::minutes(90)
        );
        // Clock skew never yields a negative duration.
        assert_eq!(
            session.duration(started_at - Duration::minutes(1)),
            Duration::zero()
        );
    }
}
