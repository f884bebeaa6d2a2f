//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{User, UserId, UserRecord, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str =
    "id, phone, name, email, password_hash, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        clause: &str,
        value: &str,
    ) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, clause);

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_with_trashed(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("phone = $1", phone).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("name = $1", name).await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, phone, name, email, password_hash,
                               created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.phone())
        .bind(user.name())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.created_at())
        .bind(user.updated_at())
        .bind(user.deleted_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(&user, e))?;

        Ok(user)
    }

    async fn soft_delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to trash user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NULL, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to restore user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn force_delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn force_delete_matching(&self, phone: &str, name: &str) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE phone = $1 OR name = $2")
            .bind(phone)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete users: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }

    async fn count(&self, include_trashed: bool) -> Result<usize, DomainError> {
        let sql = if include_trashed {
            "SELECT COUNT(*) FROM users"
        } else {
            "SELECT COUNT(*) FROM users WHERE deleted_at IS NULL"
        };

        let count: i64 = sqlx::query_scalar(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

fn map_insert_error(user: &User, e: sqlx::Error) -> DomainError {
    let constraint = e
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .map(|db| db.constraint().unwrap_or_default().to_string());

    match constraint.as_deref().and_then(conflict_field) {
        Some("name") => DomainError::conflict(
            "name",
            format!("Name '{}' already exists", user.name().unwrap_or_default()),
        ),
        Some("phone") => {
            DomainError::conflict("phone", format!("Phone '{}' already exists", user.phone()))
        }
        Some(field) => DomainError::conflict(field, format!("User '{}' already exists", user.id())),
        None => DomainError::storage(format!("Failed to create user: {}", e)),
    }
}

/// Map a unique constraint name onto the user field it guards
fn conflict_field(constraint: &str) -> Option<&'static str> {
    if constraint.contains("name") {
        Some("name")
    } else if constraint.contains("phone") {
        Some("phone")
    } else if constraint.contains("pkey") {
        Some("id")
    } else {
        None
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    let id: Uuid = row.try_get("id").map_err(read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(read)?;
    let deleted_at: Option<DateTime<Utc>> = row.try_get("deleted_at").map_err(read)?;

    Ok(User::from_record(UserRecord {
        id: UserId::from(id),
        phone: row.try_get("phone").map_err(read)?,
        name: row.try_get("name").map_err(read)?,
        email: row.try_get("email").map_err(read)?,
        password_hash: row.try_get("password_hash").map_err(read)?,
        created_at,
        updated_at,
        deleted_at,
    }))
}
