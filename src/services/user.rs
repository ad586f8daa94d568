//! User service
//!
//! Implements business logic for user management:
//! - Registration (first user becomes admin)
//! - Login/logout with session tokens
//! - Session validation with lazy cleanup of expired sessions
//!
//! Login failures return a single generic authentication error regardless
//! of whether the email or the password was wrong, so the API does not
//! leak which accounts exist.

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{RegisterInput, Session, User, UserRole};
use crate::services::password::{hash_password, verify_password};
use anyhow::Context;
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Default session expiration time in days
const DEFAULT_SESSION_EXPIRATION_DAYS: i64 = 7;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for logging in
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// User service for managing users and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_expiration_days: i64,
}

impl UserService {
    /// Create a new user service with the given repositories
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_expiration_days: DEFAULT_SESSION_EXPIRATION_DAYS,
        }
    }

    /// Create a new user service with custom session expiration
    pub fn with_session_expiration(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_expiration_days: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_expiration_days,
        }
    }

    /// Register a new user
    ///
    /// If this is the first user in the system, they are automatically
    /// assigned the Admin role. Everyone after that is a Member.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if email, password, or name is empty
    /// - `UserExists` if the email is already registered
    /// - `InternalError` for database errors
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserServiceError> {
        self.validate_register_input(&input)?;

        if self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        // First user becomes admin
        let role = if self.is_first_user().await? {
            UserRole::Admin
        } else {
            UserRole::Member
        };

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = User::new(input.email, password_hash, input.name, role);

        let created_user = self
            .user_repo
            .create(&user)
            .await
            .context("Failed to create user")?;

        Ok(created_user)
    }

    /// Login with credentials
    ///
    /// Validates the provided credentials and creates a new session if valid.
    ///
    /// # Errors
    ///
    /// - `AuthenticationError` if credentials are invalid
    /// - `InternalError` for database errors
    pub async fn login(&self, input: LoginInput) -> Result<Session, UserServiceError> {
        let user = self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| {
                UserServiceError::AuthenticationError(
                    "Invalid email or password".to_string(),
                )
            })?;

        let password_valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            return Err(UserServiceError::AuthenticationError(
                "Invalid email or password".to_string(),
            ));
        }

        let session = self.create_session(user.id).await?;

        Ok(session)
    }

    /// Logout (invalidate session)
    ///
    /// Deletes the session from the database.
    pub async fn logout(&self, session_id: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(session_id)
            .await
            .context("Failed to delete session")?;

        Ok(())
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user by ID")?;

        Ok(user)
    }

    /// Validate session token and return the associated user
    ///
    /// Returns `None` if the session doesn't exist or is expired. Expired
    /// sessions are deleted on the way out.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let session = match self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to get session")?
        {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.is_expired() {
            // Clean up expired session
            let _ = self.session_repo.delete(token).await;
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to get session user")?;

        Ok(user)
    }

    /// Create a new session for the given user
    pub async fn create_session(&self, user_id: i64) -> Result<Session, UserServiceError> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + Duration::days(self.session_expiration_days),
            created_at: now,
        };

        let created = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        Ok(created)
    }

    /// Check if no users exist yet
    async fn is_first_user(&self) -> Result<bool, UserServiceError> {
        let count = self
            .user_repo
            .count()
            .await
            .context("Failed to count users")?;

        Ok(count == 0)
    }

    fn validate_register_input(&self, input: &RegisterInput) -> Result<(), UserServiceError> {
        if input.email.trim().is_empty() {
            return Err(UserServiceError::ValidationError(
                "Email cannot be empty".to_string(),
            ));
        }
        if input.name.trim().is_empty() {
            return Err(UserServiceError::ValidationError(
                "Name cannot be empty".to_string(),
            ));
        }
        if input.password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Password cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxSessionRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> UserService {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        UserService::new(
            SqlxUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool),
        )
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput::new(email, "hunter2!", "Test User")
    }

    #[tokio::test]
    async fn test_first_registered_user_is_admin() {
        let service = setup().await;

        let first = service
            .register(register_input("first@example.com"))
            .await
            .expect("Registration failed");
        assert_eq!(first.role, UserRole::Admin);

        let second = service
            .register(register_input("second@example.com"))
            .await
            .expect("Registration failed");
        assert_eq!(second.role, UserRole::Member);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let service = setup().await;

        service
            .register(register_input("dup@example.com"))
            .await
            .unwrap();

        let result = service.register(register_input("dup@example.com")).await;
        assert!(matches!(result, Err(UserServiceError::UserExists(_))));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let service = setup().await;

        let result = service
            .register(RegisterInput::new("", "pw", "Name"))
            .await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));

        let result = service
            .register(RegisterInput::new("a@b.com", "", "Name"))
            .await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_register_does_not_store_plaintext_password() {
        let service = setup().await;

        let user = service
            .register(register_input("hashed@example.com"))
            .await
            .unwrap();
        assert_ne!(user.password_hash, "hunter2!");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_login_with_valid_credentials() {
        let service = setup().await;

        let user = service
            .register(register_input("login@example.com"))
            .await
            .unwrap();

        let session = service
            .login(LoginInput {
                email: "login@example.com".to_string(),
                password: "hunter2!".to_string(),
            })
            .await
            .expect("Login failed");
        assert_eq!(session.user_id, user.id);
        assert!(!session.is_expired());
    }

    #[tokio::test]
    async fn test_login_failures_use_same_message() {
        let service = setup().await;

        service
            .register(register_input("present@example.com"))
            .await
            .unwrap();

        let unknown = service
            .login(LoginInput {
                email: "absent@example.com".to_string(),
                password: "hunter2!".to_string(),
            })
            .await;
        let wrong_password = service
            .login(LoginInput {
                email: "present@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        let msg_unknown = match unknown {
            Err(UserServiceError::AuthenticationError(m)) => m,
            other => panic!("Expected authentication error, got {:?}", other),
        };
        let msg_wrong = match wrong_password {
            Err(UserServiceError::AuthenticationError(m)) => m,
            other => panic!("Expected authentication error, got {:?}", other),
        };
        assert_eq!(msg_unknown, msg_wrong);
    }

    #[tokio::test]
    async fn test_validate_session_returns_user() {
        let service = setup().await;

        let user = service
            .register(register_input("sess@example.com"))
            .await
            .unwrap();
        let session = service
            .login(LoginInput {
                email: "sess@example.com".to_string(),
                password: "hunter2!".to_string(),
            })
            .await
            .unwrap();

        let validated = service
            .validate_session(&session.id)
            .await
            .unwrap()
            .expect("Session should be valid");
        assert_eq!(validated.id, user.id);
    }

    #[tokio::test]
    async fn test_validate_session_rejects_unknown_token() {
        let service = setup().await;

        let validated = service.validate_session("no-such-token").await.unwrap();
        assert!(validated.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_removed() {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let session_repo = SqlxSessionRepository::boxed(pool.clone());
        let service = UserService::with_session_expiration(
            SqlxUserRepository::boxed(pool),
            session_repo.clone(),
            -1,
        );

        service
            .register(register_input("stale@example.com"))
            .await
            .unwrap();
        let session = service
            .login(LoginInput {
                email: "stale@example.com".to_string(),
                password: "hunter2!".to_string(),
            })
            .await
            .unwrap();

        let validated = service.validate_session(&session.id).await.unwrap();
        assert!(validated.is_none());
        assert!(session_repo.get_by_id(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let service = setup().await;

        service
            .register(register_input("bye@example.com"))
            .await
            .unwrap();
        let session = service
            .login(LoginInput {
                email: "bye@example.com".to_string(),
                password: "hunter2!".to_string(),
            })
            .await
            .unwrap();

        service.logout(&session.id).await.unwrap();

        let validated = service.validate_session(&session.id).await.unwrap();
        assert!(validated.is_none());
    }
}
