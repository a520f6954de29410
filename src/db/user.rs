//! User account types.

use chrono::{DateTime, Utc};

/// A registered user account.
#[derive(Debug, Clone)]
pub struct User {
    /// Externally supplied numeric user id.
    pub user_id: i64,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: i64,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(user_id: i64, password_hash: impl Into<String>) -> Self {
        Self {
            user_id,
            password_hash: password_hash.into(),
        }
    }
}
