//! Post API endpoints
//!
//! Handles HTTP requests for blog posts:
//! - GET /api/v1/posts - List all posts (public)
//! - GET /api/v1/posts/{id} - Get a single post (public)
//! - POST /api/v1/posts - Create a post (admin)
//! - PUT /api/v1/posts/{id} - Update a post (admin)
//! - DELETE /api/v1/posts/{id} - Delete a post (admin)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreatePostInput, Post, UpdatePostInput};
use crate::services::PostServiceError;

/// Response for a single post
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub image_url: String,
    pub date: String,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PostResponse {
    fn from_post(post: Post, author_name: Option<String>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            subtitle: post.subtitle,
            body: post.body,
            image_url: post.image_url,
            date: post.date,
            author_id: post.author_id,
            author_name,
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

/// Build public post routes (no auth required)
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/{id}", get(get_post))
}

/// Build admin post routes (requires auth + admin middleware)
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_post))
        .route("/{id}", put(update_post))
        .route("/{id}", delete(delete_post))
}

fn map_post_error(e: PostServiceError) -> ApiError {
    match e {
        PostServiceError::NotFound(id) => ApiError::not_found(format!("Post {} not found", id)),
        PostServiceError::DuplicateTitle(title) => {
            ApiError::conflict(format!("A post titled '{}' already exists", title))
        }
        PostServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        PostServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
    }
}

async fn author_name(state: &AppState, author_id: i64) -> Result<Option<String>, ApiError> {
    let user = state
        .user_service
        .get_by_id(author_id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(user.map(|u| u.name))
}

/// GET /api/v1/posts - List all posts, newest first
async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.post_service.list().await.map_err(map_post_error)?;

    let mut responses = Vec::with_capacity(posts.len());
    for post in posts {
        let name = author_name(&state, post.author_id).await?;
        responses.push(PostResponse::from_post(post, name));
    }

    Ok(Json(responses))
}

/// GET /api/v1/posts/{id} - Get a single post
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.post_service.get(id).await.map_err(map_post_error)?;
    let name = author_name(&state, post.author_id).await?;

    Ok(Json(PostResponse::from_post(post, name)))
}

/// POST /api/v1/posts - Create a post
///
/// Admin only. The authenticated user becomes the author.
async fn create_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<CreatePostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .post_service
        .create(input, user.0.id)
        .await
        .map_err(map_post_error)?;

    let name = author_name(&state, post.author_id).await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from_post(post, name))))
}

/// PUT /api/v1/posts/{id} - Update a post
///
/// Admin only. Only provided fields change.
async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdatePostInput>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .post_service
        .update(id, input)
        .await
        .map_err(map_post_error)?;

    let name = author_name(&state, post.author_id).await?;

    Ok(Json(PostResponse::from_post(post, name)))
}

/// DELETE /api/v1/posts/{id} - Delete a post and its comments
///
/// Admin only.
async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.post_service.delete(id).await.map_err(map_post_error)?;

    Ok(StatusCode::NO_CONTENT)
}
