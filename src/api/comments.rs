//! Comment API endpoints
//!
//! Handles HTTP requests for post comments:
//! - GET /api/v1/posts/{id}/comments - List a post's comments (public)
//! - POST /api/v1/posts/{id}/comments - Add a comment (authenticated)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::CommentWithAuthor;
use crate::services::CommentServiceError;

/// Request body for creating a comment
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

/// Response for a single comment
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub author_name: String,
    pub body: String,
    pub created_at: String,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(comment: CommentWithAuthor) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            author_name: comment.author_name,
            body: comment.body,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// Build public comment routes (no auth required)
pub fn public_router() -> Router<AppState> {
    Router::new().route("/{id}/comments", get(list_comments))
}

/// Build protected comment routes (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/{id}/comments", post(create_comment))
}

fn map_comment_error(e: CommentServiceError) -> ApiError {
    match e {
        CommentServiceError::PostNotFound(id) => {
            ApiError::not_found(format!("Post {} not found", id))
        }
        CommentServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        CommentServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
    }
}

/// GET /api/v1/posts/{id}/comments - List a post's comments, oldest first
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = state
        .comment_service
        .list_for_post(id)
        .await
        .map_err(map_comment_error)?;

    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/posts/{id}/comments - Add a comment
///
/// Requires authentication. The authenticated user becomes the
/// comment's author.
async fn create_comment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state
        .comment_service
        .create(id, user.0.id, body.body)
        .await
        .map_err(map_comment_error)?;

    let response = CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        user_id: comment.user_id,
        author_name: user.0.name,
        body: comment.body,
        created_at: comment.created_at.to_rfc3339(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}
