//! User repository
//!
//! Database operations for users:
//! - `UserRepository` trait defining the interface for user data access
//! - `SqlxUserRepository` implementing the trait for SQLite and MySQL
//!
//! Users are only ever created and read; there is no update or delete path.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{User, UserRole};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: &User) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get user by email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Count total users
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_user_sqlite(self.pool.as_sqlite().unwrap(), user).await
            }
            DatabaseDriver::Mysql => create_user_mysql(self.pool.as_mysql().unwrap(), user).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_user_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => get_user_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_user_by_email_sqlite(self.pool.as_sqlite().unwrap(), email).await
            }
            DatabaseDriver::Mysql => {
                get_user_by_email_mysql(self.pool.as_mysql().unwrap(), email).await
            }
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_users_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_users_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_user_sqlite(pool: &SqlitePool, user: &User) -> Result<User> {
    let now = Utc::now();
    let role_str = user.role.to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO users (email, password_hash, name, role, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.name)
    .bind(&role_str)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    let id = result.last_insert_rowid();

    Ok(User {
        id,
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        name: user.name.clone(),
        role: user.role,
        created_at: now,
    })
}

async fn get_user_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, email, password_hash, name, role, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get user by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_user_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn get_user_by_email_sqlite(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, email, password_hash, name, role, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .context("Failed to get user by email")?;

    match row {
        Some(row) => Ok(Some(row_to_user_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn count_users_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM users")
        .fetch_one(pool)
        .await
        .context("Failed to count users")?;

    Ok(row.get("count"))
}

fn row_to_user_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    let role_str: String = row.get("role");
    let role = UserRole::from_str(&role_str)
        .with_context(|| format!("Invalid role in database: {}", role_str))?;

    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        name: row.get("name"),
        role,
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_user_mysql(pool: &MySqlPool, user: &User) -> Result<User> {
    let now = Utc::now();
    let role_str = user.role.to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO users (email, password_hash, name, role, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.name)
    .bind(&role_str)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    let id = result.last_insert_id() as i64;

    Ok(User {
        id,
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        name: user.name.clone(),
        role: user.role,
        created_at: now,
    })
}

async fn get_user_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, email, password_hash, name, role, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get user by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_user_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn get_user_by_email_mysql(pool: &MySqlPool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT id, email, password_hash, name, role, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .context("Failed to get user by email")?;

    match row {
        Some(row) => Ok(Some(row_to_user_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn count_users_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM users")
        .fetch_one(pool)
        .await
        .context("Failed to count users")?;

    Ok(row.get("count"))
}

fn row_to_user_mysql(row: &sqlx::mysql::MySqlRow) -> Result<User> {
    let role_str: String = row.get("role");
    let role = UserRole::from_str(&role_str)
        .with_context(|| format!("Invalid role in database: {}", role_str))?;

    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        name: row.get("name"),
        role,
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn test_repo() -> SqlxUserRepository {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxUserRepository::new(pool)
    }

    fn sample_user(email: &str, role: UserRole) -> User {
        User::new(
            email.to_string(),
            "$argon2id$fakehash".to_string(),
            "Sample".to_string(),
            role,
        )
    }

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let repo = test_repo().await;

        let created = repo
            .create(&sample_user("a@example.com", UserRole::Admin))
            .await
            .expect("Create failed");
        assert!(created.id > 0);

        let fetched = repo
            .get_by_id(created.id)
            .await
            .expect("Get failed")
            .expect("User should exist");
        assert_eq!(fetched.email, "a@example.com");
        assert_eq!(fetched.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let repo = test_repo().await;
        repo.create(&sample_user("b@example.com", UserRole::Member))
            .await
            .expect("Create failed");

        let found = repo.get_by_email("b@example.com").await.unwrap();
        assert!(found.is_some());

        let missing = repo.get_by_email("nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_count() {
        let repo = test_repo().await;
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(&sample_user("c@example.com", UserRole::Admin))
            .await
            .unwrap();
        repo.create(&sample_user("d@example.com", UserRole::Member))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_errors() {
        let repo = test_repo().await;
        repo.create(&sample_user("dup@example.com", UserRole::Member))
            .await
            .unwrap();

        let result = repo.create(&sample_user("dup@example.com", UserRole::Member)).await;
        assert!(result.is_err());
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
