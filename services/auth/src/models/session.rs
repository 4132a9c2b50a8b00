//! Session model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserRecord;

/// Time-limited session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Issue a token for `user` valid for `lifetime` from `now`
    pub fn issue(user: &UserRecord, now: DateTime<Utc>, lifetime: chrono::Duration) -> Self {
        let expires_at = now
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            issued_at: now,
            expires_at,
        }
    }

    /// Whether the token is still valid at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Denormalized display copy of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUserView {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&UserRecord> for CurrentUserView {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
