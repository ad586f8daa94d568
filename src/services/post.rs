//! Post service
//!
//! Implements business logic for blog posts:
//! - Listing (newest first) and single-post lookup
//! - Creation with a unique-title check and a display date stamped
//!   at creation time ("%B %d, %Y")
//! - Partial updates that keep the display date and creation time
//! - Deletion, which also removes the post's comments via the
//!   database cascade

use crate::db::repositories::PostRepository;
use crate::models::{CreatePostInput, Post, UpdatePostInput};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    NotFound(i64),

    /// A post with the same title already exists
    #[error("A post titled '{0}' already exists")]
    DuplicateTitle(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Post service for managing blog posts
pub struct PostService {
    post_repo: Arc<dyn PostRepository>,
}

impl PostService {
    /// Create a new post service
    pub fn new(post_repo: Arc<dyn PostRepository>) -> Self {
        Self { post_repo }
    }

    /// List all posts, newest first
    pub async fn list(&self) -> Result<Vec<Post>, PostServiceError> {
        let posts = self
            .post_repo
            .list()
            .await
            .context("Failed to list posts")?;

        Ok(posts)
    }

    /// Get a post by ID
    ///
    /// # Errors
    ///
    /// - `NotFound` if no post has the given ID
    pub async fn get(&self, id: i64) -> Result<Post, PostServiceError> {
        self.post_repo
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or(PostServiceError::NotFound(id))
    }

    /// Create a new post
    ///
    /// The display date is stamped from the current time, e.g.
    /// "August 30, 2026".
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the title or body is empty
    /// - `DuplicateTitle` if a post with the same title exists
    pub async fn create(
        &self,
        input: CreatePostInput,
        author_id: i64,
    ) -> Result<Post, PostServiceError> {
        if input.title.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if input.body.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Body cannot be empty".to_string(),
            ));
        }

        if self
            .post_repo
            .get_by_title(&input.title)
            .await
            .context("Failed to check title")?
            .is_some()
        {
            return Err(PostServiceError::DuplicateTitle(input.title));
        }

        let date = Utc::now().format("%B %d, %Y").to_string();
        let post = Post::new(
            input.title,
            input.subtitle,
            input.body,
            input.image_url,
            date,
            author_id,
        );

        let created = self
            .post_repo
            .create(&post)
            .await
            .context("Failed to create post")?;

        Ok(created)
    }

    /// Update a post
    ///
    /// Only the provided fields change; the display date and creation
    /// timestamp are preserved.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no post has the given ID
    /// - `DuplicateTitle` if renaming to a title another post holds
    pub async fn update(&self, id: i64, input: UpdatePostInput) -> Result<Post, PostServiceError> {
        let mut post = self.get(id).await?;

        if input.is_empty() {
            return Ok(post);
        }

        if let Some(ref title) = input.title {
            if title.trim().is_empty() {
                return Err(PostServiceError::ValidationError(
                    "Title cannot be empty".to_string(),
                ));
            }
            if let Some(existing) = self
                .post_repo
                .get_by_title(title)
                .await
                .context("Failed to check title")?
            {
                if existing.id != id {
                    return Err(PostServiceError::DuplicateTitle(title.clone()));
                }
            }
        }

        if let Some(title) = input.title {
            post.title = title;
        }
        if let Some(subtitle) = input.subtitle {
            post.subtitle = subtitle;
        }
        if let Some(body) = input.body {
            post.body = body;
        }
        if let Some(image_url) = input.image_url {
            post.image_url = image_url;
        }
        post.updated_at = Utc::now();

        let updated = self
            .post_repo
            .update(&post)
            .await
            .context("Failed to update post")?;

        Ok(updated)
    }

    /// Delete a post
    ///
    /// Comments on the post are removed by the database cascade.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no post has the given ID
    pub async fn delete(&self, id: i64) -> Result<(), PostServiceError> {
        let deleted = self
            .post_repo
            .delete(id)
            .await
            .context("Failed to delete post")?;

        if !deleted {
            return Err(PostServiceError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxPostRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{User, UserRole};

    async fn setup() -> (PostService, i64) {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::new(pool.clone());
        let admin = user_repo
            .create(&User::new(
                "admin@example.com".to_string(),
                "hash".to_string(),
                "Admin".to_string(),
                UserRole::Admin,
            ))
            .await
            .expect("Failed to create admin");

        (PostService::new(SqlxPostRepository::boxed(pool)), admin.id)
    }

    fn create_input(title: &str) -> CreatePostInput {
        CreatePostInput {
            title: title.to_string(),
            subtitle: "Sub".to_string(),
            body: "Body".to_string(),
            image_url: "https://example.com/img.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_stamps_display_date() {
        let (service, admin_id) = setup().await;

        let post = service
            .create(create_input("Dated"), admin_id)
            .await
            .expect("Create failed");

        let expected = Utc::now().format("%B %d, %Y").to_string();
        assert_eq!(post.date, expected);
        assert_eq!(post.author_id, admin_id);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_title() {
        let (service, admin_id) = setup().await;

        service.create(create_input("Taken"), admin_id).await.unwrap();
        let result = service.create(create_input("Taken"), admin_id).await;
        assert!(matches!(result, Err(PostServiceError::DuplicateTitle(_))));
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let (service, admin_id) = setup().await;

        let result = service.create(create_input(""), admin_id).await;
        assert!(matches!(result, Err(PostServiceError::ValidationError(_))));

        let mut input = create_input("Valid Title");
        input.body = "   ".to_string();
        let result = service.create(input, admin_id).await;
        assert!(matches!(result, Err(PostServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_get_missing_post_is_not_found() {
        let (service, _admin_id) = setup().await;

        let result = service.get(404).await;
        assert!(matches!(result, Err(PostServiceError::NotFound(404))));
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let (service, admin_id) = setup().await;

        let post = service.create(create_input("Original"), admin_id).await.unwrap();

        let updated = service
            .update(
                post.id,
                UpdatePostInput {
                    body: Some("New body".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed");

        assert_eq!(updated.title, "Original");
        assert_eq!(updated.body, "New body");
        assert_eq!(updated.date, post.date);
    }

    #[tokio::test]
    async fn test_update_rejects_title_held_by_another_post() {
        let (service, admin_id) = setup().await;

        service.create(create_input("First"), admin_id).await.unwrap();
        let second = service.create(create_input("Second"), admin_id).await.unwrap();

        let result = service
            .update(
                second.id,
                UpdatePostInput {
                    title: Some("First".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(PostServiceError::DuplicateTitle(_))));

        // Keeping its own title is fine
        let kept = service
            .update(
                second.id,
                UpdatePostInput {
                    title: Some("Second".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(kept.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let (service, _admin_id) = setup().await;

        let result = service
            .update(
                99,
                UpdatePostInput {
                    body: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(PostServiceError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_delete_post() {
        let (service, admin_id) = setup().await;

        let post = service.create(create_input("Doomed"), admin_id).await.unwrap();
        service.delete(post.id).await.expect("Delete failed");

        assert!(matches!(
            service.get(post.id).await,
            Err(PostServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(post.id).await,
            Err(PostServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (service, admin_id) = setup().await;

        let older = service.create(create_input("Older"), admin_id).await.unwrap();
        let newer = service.create(create_input("Newer"), admin_id).await.unwrap();

        let posts = service.list().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, newer.id);
        assert_eq!(posts[1].id, older.id);
    }
}
