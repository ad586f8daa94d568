//! Comment service
//!
//! Implements business logic for post comments:
//! - Creating a comment on an existing post (the post is checked first,
//!   so a missing post surfaces as a not-found error rather than a
//!   foreign key failure)
//! - Listing a post's comments with author names, oldest first

use crate::db::repositories::{CommentRepository, PostRepository};
use crate::models::{Comment, CommentWithAuthor};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for comment service operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    PostNotFound(i64),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Comment service for managing post comments
pub struct CommentService {
    comment_repo: Arc<dyn CommentRepository>,
    post_repo: Arc<dyn PostRepository>,
}

impl CommentService {
    /// Create a new comment service
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        post_repo: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    /// Create a comment on a post
    ///
    /// # Errors
    ///
    /// - `PostNotFound` if the post doesn't exist
    /// - `ValidationError` if the body is empty
    pub async fn create(
        &self,
        post_id: i64,
        user_id: i64,
        body: String,
    ) -> Result<Comment, CommentServiceError> {
        if body.trim().is_empty() {
            return Err(CommentServiceError::ValidationError(
                "Comment body cannot be empty".to_string(),
            ));
        }

        if self
            .post_repo
            .get_by_id(post_id)
            .await
            .context("Failed to check post")?
            .is_none()
        {
            return Err(CommentServiceError::PostNotFound(post_id));
        }

        let comment = Comment {
            id: 0,
            post_id,
            user_id,
            body,
            created_at: Utc::now(),
        };

        let created = self
            .comment_repo
            .create(&comment)
            .await
            .context("Failed to create comment")?;

        Ok(created)
    }

    /// List a post's comments with author names, oldest first
    ///
    /// # Errors
    ///
    /// - `PostNotFound` if the post doesn't exist
    pub async fn list_for_post(
        &self,
        post_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, CommentServiceError> {
        if self
            .post_repo
            .get_by_id(post_id)
            .await
            .context("Failed to check post")?
            .is_none()
        {
            return Err(CommentServiceError::PostNotFound(post_id));
        }

        let comments = self
            .comment_repo
            .list_by_post(post_id)
            .await
            .context("Failed to list comments")?;

        Ok(comments)
    }
}
