//! User account repository.

use crate::db::{parse_datetime, DbPool};
use crate::{FeedPoolError, Result};

use super::user::{NewUser, User};

/// Repository for user account persistence.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user account.
    ///
    /// Fails with a validation error when the user id is already taken.
    pub async fn create(&self, new_user: &NewUser) -> Result<()> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO users (user_id, password) VALUES ($1, $2)",
        )
        .bind(new_user.user_id)
        .bind(&new_user.password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(FeedPoolError::Validation(format!(
                "user {} already exists",
                new_user.user_id
            )));
        }

        tracing::info!(user_id = new_user.user_id, "user created");
        Ok(())
    }

    /// Look up a user by id.
    pub async fn get_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let row: Option<(i64, String, String)> = sqlx::query_as(
            "SELECT user_id, password, created_at FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(user_id, password_hash, created_at)| User {
            user_id,
            password_hash,
            created_at: parse_datetime(&created_at),
        }))
    }

    /// Whether a user with the given id exists.
    pub async fn exists(&self, user_id: i64) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;
        Ok(count > 0)
    }
}
