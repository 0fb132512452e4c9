//! # User Repository
//!
//! Clients and administrators. Only what booking and search need; there is
//! no authentication here.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use fleet_core::{NewUser, User, UserId};

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    pub async fn get_by_id(&self, id: UserId) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, full_name, role FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, full_name, role FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, full_name, role FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Inserts a new user.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Username already taken
    pub async fn insert(&self, user: &NewUser) -> DbResult<User> {
        debug!(username = %user.username, "Inserting user");

        let result = sqlx::query(
            "INSERT INTO users (username, full_name, role) VALUES (?1, ?2, ?3)",
        )
        .bind(&user.username)
        .bind(&user.full_name)
        .bind(user.role)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
        })
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use fleet_core::{NewUser, UserRole};

    #[tokio::test]
    async fn test_duplicate_username() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = NewUser {
            username: "mkowalski".to_string(),
            full_name: "Marta Kowalski".to_string(),
            role: UserRole::Client,
        };

        let stored = db.user_repo().insert(&user).await.unwrap();
        let found = db.user_repo().get_by_username("mkowalski").await.unwrap();
        assert_eq!(found, Some(stored));

        let err = db.user_repo().insert(&user).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
