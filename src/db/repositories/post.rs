//! Post repository
//!
//! Database operations for blog posts:
//! - `PostRepository` trait defining the interface for post data access
//! - `SqlxPostRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Post;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, post: &Post) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Get post by title
    async fn get_by_title(&self, title: &str) -> Result<Option<Post>>;

    /// List all posts, newest first
    async fn list(&self) -> Result<Vec<Post>>;

    /// Update a post
    async fn update(&self, post: &Post) -> Result<Post>;

    /// Delete a post, returning whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_post_sqlite(self.pool.as_sqlite().unwrap(), post).await
            }
            DatabaseDriver::Mysql => create_post_mysql(self.pool.as_mysql().unwrap(), post).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_post_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => get_post_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_post_by_title_sqlite(self.pool.as_sqlite().unwrap(), title).await
            }
            DatabaseDriver::Mysql => {
                get_post_by_title_mysql(self.pool.as_mysql().unwrap(), title).await
            }
        }
    }

    async fn list(&self) -> Result<Vec<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_posts_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_posts_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, post: &Post) -> Result<Post> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_post_sqlite(self.pool.as_sqlite().unwrap(), post).await
            }
            DatabaseDriver::Mysql => update_post_mysql(self.pool.as_mysql().unwrap(), post).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_post_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_post_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_post_sqlite(pool: &SqlitePool, post: &Post) -> Result<Post> {
    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, subtitle, body, image_url, date, author_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&post.title)
    .bind(&post.subtitle)
    .bind(&post.body)
    .bind(&post.image_url)
    .bind(&post.date)
    .bind(post.author_id)
    .bind(post.created_at)
    .bind(post.updated_at)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    let id = result.last_insert_rowid();
    let mut created = post.clone();
    created.id = id;
    Ok(created)
}

async fn get_post_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, subtitle, body, image_url, date, author_id, created_at, updated_at
        FROM posts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_post_sqlite(&row))),
        None => Ok(None),
    }
}

async fn get_post_by_title_sqlite(pool: &SqlitePool, title: &str) -> Result<Option<Post>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, subtitle, body, image_url, date, author_id, created_at, updated_at
        FROM posts
        WHERE title = ?
        "#,
    )
    .bind(title)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by title")?;

    match row {
        Some(row) => Ok(Some(row_to_post_sqlite(&row))),
        None => Ok(None),
    }
}

async fn list_posts_sqlite(pool: &SqlitePool) -> Result<Vec<Post>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, subtitle, body, image_url, date, author_id, created_at, updated_at
        FROM posts
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    Ok(rows.iter().map(row_to_post_sqlite).collect())
}

async fn update_post_sqlite(pool: &SqlitePool, post: &Post) -> Result<Post> {
    sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, subtitle = ?, body = ?, image_url = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&post.title)
    .bind(&post.subtitle)
    .bind(&post.body)
    .bind(&post.image_url)
    .bind(post.updated_at)
    .bind(post.id)
    .execute(pool)
    .await
    .context("Failed to update post")?;

    Ok(post.clone())
}

async fn delete_post_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete post")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_post_sqlite(row: &sqlx::sqlite::SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        subtitle: row.get("subtitle"),
        body: row.get("body"),
        image_url: row.get("image_url"),
        date: row.get("date"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_post_mysql(pool: &MySqlPool, post: &Post) -> Result<Post> {
    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, subtitle, body, image_url, date, author_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&post.title)
    .bind(&post.subtitle)
    .bind(&post.body)
    .bind(&post.image_url)
    .bind(&post.date)
    .bind(post.author_id)
    .bind(post.created_at)
    .bind(post.updated_at)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    let id = result.last_insert_id() as i64;
    let mut created = post.clone();
    created.id = id;
    Ok(created)
}

async fn get_post_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, subtitle, body, image_url, date, author_id, created_at, updated_at
        FROM posts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_post_mysql(&row))),
        None => Ok(None),
    }
}

async fn get_post_by_title_mysql(pool: &MySqlPool, title: &str) -> Result<Option<Post>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, subtitle, body, image_url, date, author_id, created_at, updated_at
        FROM posts
        WHERE title = ?
        "#,
    )
    .bind(title)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by title")?;

    match row {
        Some(row) => Ok(Some(row_to_post_mysql(&row))),
        None => Ok(None),
    }
}

async fn list_posts_mysql(pool: &MySqlPool) -> Result<Vec<Post>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, subtitle, body, image_url, date, author_id, created_at, updated_at
        FROM posts
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    Ok(rows.iter().map(row_to_post_mysql).collect())
}

async fn update_post_mysql(pool: &MySqlPool, post: &Post) -> Result<Post> {
    sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, subtitle = ?, body = ?, image_url = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&post.title)
    .bind(&post.subtitle)
    .bind(&post.body)
    .bind(&post.image_url)
    .bind(post.updated_at)
    .bind(post.id)
    .execute(pool)
    .await
    .context("Failed to update post")?;

    Ok(post.clone())
}

async fn delete_post_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete post")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_post_mysql(row: &sqlx::mysql::MySqlRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        subtitle: row.get("subtitle"),
        body: row.get("body"),
        image_url: row.get("image_url"),
        date: row.get("date"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::user::{SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::{User, UserRole};

    async fn setup() -> (DynDatabasePool, SqlxPostRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::new(pool.clone());
        let author = user_repo
            .create(&User::new(
                "author@example.com".to_string(),
                "hash".to_string(),
                "Author".to_string(),
                UserRole::Admin,
            ))
            .await
            .expect("Failed to create author");

        let repo = SqlxPostRepository::new(pool.clone());
        (pool, repo, author.id)
    }

    fn sample_post(author_id: i64, title: &str) -> Post {
        Post::new(
            title.to_string(),
            "A subtitle".to_string(),
            "Body text".to_string(),
            "https://example.com/img.png".to_string(),
            "August 30, 2026".to_string(),
            author_id,
        )
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let (_pool, repo, author_id) = setup().await;

        let created = repo
            .create(&sample_post(author_id, "First Post"))
            .await
            .expect("Create failed");
        assert!(created.id > 0);

        let fetched = repo
            .get_by_id(created.id)
            .await
            .expect("Get failed")
            .expect("Post should exist");
        assert_eq!(fetched.title, "First Post");
        assert_eq!(fetched.author_id, author_id);
        assert_eq!(fetched.date, "August 30, 2026");
    }

    #[tokio::test]
    async fn test_get_by_title() {
        let (_pool, repo, author_id) = setup().await;

        repo.create(&sample_post(author_id, "Unique Title"))
            .await
            .unwrap();

        let found = repo.get_by_title("Unique Title").await.unwrap();
        assert!(found.is_some());

        let missing = repo.get_by_title("No Such Title").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_posts_newest_first() {
        let (_pool, repo, author_id) = setup().await;

        let first = repo.create(&sample_post(author_id, "Older")).await.unwrap();
        let second = repo.create(&sample_post(author_id, "Newer")).await.unwrap();

        let posts = repo.list().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, second.id);
        assert_eq!(posts[1].id, first.id);
    }

    #[tokio::test]
    async fn test_update_post() {
        let (_pool, repo, author_id) = setup().await;

        let mut post = repo
            .create(&sample_post(author_id, "Before"))
            .await
            .unwrap();
        post.title = "After".to_string();
        post.body = "Revised body".to_string();
        repo.update(&post).await.unwrap();

        let fetched = repo.get_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "After");
        assert_eq!(fetched.body, "Revised body");
    }

    #[tokio::test]
    async fn test_delete_post() {
        let (_pool, repo, author_id) = setup().await;

        let post = repo.create(&sample_post(author_id, "Doomed")).await.unwrap();
        assert!(repo.delete(post.id).await.unwrap());
        assert!(repo.get_by_id(post.id).await.unwrap().is_none());

        // Deleting again reports no rows removed
        assert!(!repo.delete(post.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected() {
        let (_pool, repo, author_id) = setup().await;

        repo.create(&sample_post(author_id, "One Of A Kind"))
            .await
            .unwrap();
        assert!(repo
            .create(&sample_post(author_id, "One Of A Kind"))
            .await
            .is_err());
    }
}
