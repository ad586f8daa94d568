//! Authentication API endpoints
//!
//! Handles HTTP requests for user authentication:
//! - POST /api/v1/auth/register - User registration (logs the user in)
//! - POST /api/v1/auth/login - User login
//! - POST /api/v1/auth/logout - User logout
//! - GET /api/v1/auth/me - Get current user

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{extract_session_token, ApiError, AppState, AuthenticatedUser};
use crate::models::RegisterInput;
use crate::services::{LoginInput, UserServiceError};

/// Session cookie lifetime in seconds (7 days, matching session expiry)
const SESSION_COOKIE_MAX_AGE: i64 = 7 * 24 * 60 * 60;

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for successful authentication
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Response for user info
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: String,
}

impl From<crate::models::User> for UserResponse {
    fn from(user: crate::models::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role.to_string(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Build protected auth routes (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
}

/// Build public auth routes (no auth required)
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

fn session_cookie_headers(token: &str) -> Result<HeaderMap, ApiError> {
    let cookie = format!(
        "session={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        token, SESSION_COOKIE_MAX_AGE
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::internal_error(format!("Invalid cookie value: {}", e)))?,
    );
    Ok(headers)
}

fn map_user_error(e: UserServiceError) -> ApiError {
    match e {
        UserServiceError::AuthenticationError(msg) => ApiError::unauthorized(msg),
        UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        UserServiceError::UserExists(msg) => ApiError::conflict(msg),
        UserServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
    }
}

/// POST /api/v1/auth/register - User registration
///
/// The new user is logged in immediately; the response carries the
/// session token and sets the session cookie.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = RegisterInput::new(body.email, body.password, body.name);

    let user = state
        .user_service
        .register(input)
        .await
        .map_err(map_user_error)?;

    let session = state
        .user_service
        .create_session(user.id)
        .await
        .map_err(map_user_error)?;

    let headers = session_cookie_headers(&session.id)?;

    Ok((
        StatusCode::CREATED,
        headers,
        Json(AuthResponse {
            user: user.into(),
            token: session.id,
        }),
    ))
}

/// POST /api/v1/auth/login - User login
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .user_service
        .login(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(map_user_error)?;

    let user = state
        .user_service
        .get_by_id(session.user_id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| ApiError::internal_error("Session user missing"))?;

    let headers = session_cookie_headers(&session.id)?;

    Ok((
        headers,
        Json(AuthResponse {
            user: user.into(),
            token: session.id,
        }),
    ))
}

/// POST /api/v1/auth/logout - User logout
///
/// Requires authentication. Deletes the session and clears the cookie.
async fn logout(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = extract_session_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    state
        .user_service
        .logout(&token)
        .await
        .map_err(map_user_error)?;

    let clear_cookie = "session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0";
    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::SET_COOKIE, HeaderValue::from_static(clear_cookie));

    Ok((StatusCode::NO_CONTENT, response_headers))
}

/// GET /api/v1/auth/me - Get current user
///
/// Requires authentication.
async fn get_current_user(user: AuthenticatedUser) -> Json<UserResponse> {
    Json(user.0.into())
}
