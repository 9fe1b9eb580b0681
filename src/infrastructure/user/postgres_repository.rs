//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::auth::{TokenPurpose, TokenSlot};
use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, name, email, phone_number, password_digest, admin, \
     activated, activated_at, activation_digest, activation_issued_at, \
     remember_digest, remember_issued_at, reset_digest, reset_sent_at, \
     created_at, updated_at";

/// PostgreSQL implementation of UserRepository
///
/// The schema enforces uniqueness on the lower-cased email and cascades
/// micropost deletion on user deletion.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (name, email, phone_number, password_digest, admin,
                               activation_digest, activation_issued_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_user.name())
        .bind(new_user.email())
        .bind(new_user.phone_number())
        .bind(new_user.password_digest())
        .bind(new_user.admin())
        .bind(new_user.activation().digest())
        .bind(new_user.activation().issued_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, new_user.email()))?;

        row_to_user(&row)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, phone_number = $4, password_digest = $5,
                admin = $6, activated = $7, activated_at = $8,
                remember_digest = $9, remember_issued_at = $10,
                reset_digest = $11, reset_sent_at = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(user.id().value())
        .bind(user.name())
        .bind(user.email())
        .bind(user.phone_number())
        .bind(user.password_digest())
        .bind(user.is_admin())
        .bind(user.is_activated())
        .bind(user.activated_at())
        .bind(user.remember_slot().map(|s| s.digest().to_string()))
        .bind(user.remember_slot().map(|s| s.issued_at()))
        .bind(user.reset_slot().map(|s| s.digest().to_string()))
        .bind(user.reset_slot().map(|s| s.issued_at()))
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, user.email()))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        // Owned microposts go with the user via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_activated(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE activated = true ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }
}

fn map_unique_violation(e: sqlx::Error, email: &str) -> DomainError {
    if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
        DomainError::conflict(format!("Email '{}' is already taken", email))
    } else {
        DomainError::storage(format!("Failed to write user: {}", e))
    }
}

fn optional_slot(
    purpose: TokenPurpose,
    digest: Option<String>,
    issued_at: Option<DateTime<Utc>>,
) -> Option<TokenSlot> {
    match (digest, issued_at) {
        (Some(digest), Some(issued_at)) => Some(TokenSlot::new(purpose, digest, issued_at)),
        _ => None,
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Failed to read user row: {}", e));

    let activation = TokenSlot::new(
        TokenPurpose::Activation,
        row.try_get::<String, _>("activation_digest").map_err(read)?,
        row.try_get("activation_issued_at").map_err(read)?,
    );

    let remember = optional_slot(
        TokenPurpose::Remember,
        row.try_get("remember_digest").map_err(read)?,
        row.try_get("remember_issued_at").map_err(read)?,
    );

    let reset = optional_slot(
        TokenPurpose::PasswordReset,
        row.try_get("reset_digest").map_err(read)?,
        row.try_get("reset_sent_at").map_err(read)?,
    );

    Ok(User::from_parts(
        UserId::new(row.try_get("id").map_err(read)?),
        row.try_get("name").map_err(read)?,
        row.try_get("email").map_err(read)?,
        row.try_get("phone_number").map_err(read)?,
        row.try_get("password_digest").map_err(read)?,
        row.try_get("admin").map_err(read)?,
        row.try_get("activated").map_err(read)?,
        row.try_get("activated_at").map_err(read)?,
        activation,
        remember,
        reset,
        row.try_get("created_at").map_err(read)?,
        row.try_get("updated_at").map_err(read)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_violation_errors_map_to_storage() {
        let err = map_unique_violation(sqlx::Error::RowNotFound, "user@example.com");
        assert!(matches!(err, DomainError::Storage { .. }));

        let err = map_unique_violation(sqlx::Error::PoolClosed, "user@example.com");
        assert!(matches!(err, DomainError::Storage { .. }));
    }
}
