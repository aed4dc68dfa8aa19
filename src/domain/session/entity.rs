use crate::domain::user::UserId;
use chrono::{DateTime, Utc};

/// Server-side record of an opaque session cookie. Only the SHA-256 of the
/// cookie value is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub id: i64,
    pub user_id: UserId,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub is_active: bool,
}

impl AuthToken {
    pub fn revoke(&mut self) {
        self.is_active = false;
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewAuthToken {
    pub user_id: UserId,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}
