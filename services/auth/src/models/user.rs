//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity as persisted in the account collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Creation timestamp in milliseconds
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Output of the configured credential encoder
    #[serde(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// New user creation payload
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserRecord {
    /// Build a record from a creation payload, stamping id and creation time
    pub fn from_new(new_user: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id: created_at.timestamp_millis(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at,
        }
    }
}
