//! Comment repository
//!
//! Database operations for post comments:
//! - `CommentRepository` trait defining the interface for comment data access
//! - `SqlxCommentRepository` implementing the trait for SQLite and MySQL
//!
//! Listing joins the users table so callers get the author name without a
//! second query.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Comment, CommentWithAuthor};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a new comment
    async fn create(&self, comment: &Comment) -> Result<Comment>;

    /// List comments for a post with author names, oldest first
    async fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    /// Create a new SQLx comment repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<Comment> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_comment_sqlite(self.pool.as_sqlite().unwrap(), comment).await
            }
            DatabaseDriver::Mysql => {
                create_comment_mysql(self.pool.as_mysql().unwrap(), comment).await
            }
        }
    }

    async fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_comments_by_post_sqlite(self.pool.as_sqlite().unwrap(), post_id).await
            }
            DatabaseDriver::Mysql => {
                list_comments_by_post_mysql(self.pool.as_mysql().unwrap(), post_id).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_comment_sqlite(pool: &SqlitePool, comment: &Comment) -> Result<Comment> {
    let result = sqlx::query(
        r#"
        INSERT INTO comments (post_id, user_id, body, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(comment.post_id)
    .bind(comment.user_id)
    .bind(&comment.body)
    .bind(comment.created_at)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    let id = result.last_insert_rowid();
    let mut created = comment.clone();
    created.id = id;
    Ok(created)
}

async fn list_comments_by_post_sqlite(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<CommentWithAuthor>> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.post_id, c.user_id, u.name AS author_name, c.body, c.created_at
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.post_id = ?
        ORDER BY c.created_at ASC, c.id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    Ok(rows.iter().map(row_to_comment_with_author_sqlite).collect())
}

fn row_to_comment_with_author_sqlite(row: &sqlx::sqlite::SqliteRow) -> CommentWithAuthor {
    CommentWithAuthor {
        id: row.get("id"),
        post_id: row.get("post_id"),
        user_id: row.get("user_id"),
        author_name: row.get("author_name"),
        body: row.get("body"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_comment_mysql(pool: &MySqlPool, comment: &Comment) -> Result<Comment> {
    let result = sqlx::query(
        r#"
        INSERT INTO comments (post_id, user_id, body, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(comment.post_id)
    .bind(comment.user_id)
    .bind(&comment.body)
    .bind(comment.created_at)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    let id = result.last_insert_id() as i64;
    let mut created = comment.clone();
    created.id = id;
    Ok(created)
}

async fn list_comments_by_post_mysql(
    pool: &MySqlPool,
    post_id: i64,
) -> Result<Vec<CommentWithAuthor>> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.post_id, c.user_id, u.name AS author_name, c.body, c.created_at
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.post_id = ?
        ORDER BY c.created_at ASC, c.id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    Ok(rows.iter().map(row_to_comment_with_author_mysql).collect())
}

fn row_to_comment_with_author_mysql(row: &sqlx::mysql::MySqlRow) -> CommentWithAuthor {
    CommentWithAuthor {
        id: row.get("id"),
        post_id: row.get("post_id"),
        user_id: row.get("user_id"),
        author_name: row.get("author_name"),
        body: row.get("body"),
        created_at: row.get("created_at"),
    }
}
