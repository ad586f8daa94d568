//! User model
//!
//! This module defines the User entity and related types.
//!
//! Users carry an explicit role attribute; administrators are users whose
//! role is `admin`, not users with a particular row id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User entity representing a registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Email address (unique)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name
    pub name: String,
    /// User role
    pub role: UserRole,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// The password must already be hashed; use
    /// `services::password::hash_password()`.
    pub fn new(email: String, password_hash: String, name: String, role: UserRole) -> Self {
        Self {
            id: 0, // Will be set by the database
            email,
            password_hash,
            name,
            role,
            created_at: Utc::now(),
        }
    }

    /// Check if the user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// User role for authorization.
///
/// - Admin: may create, edit, and delete posts
/// - Member: may read posts and submit comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator - post authoring rights
    Admin,
    /// Regular user - read and comment
    #[default]
    Member,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Member => write!(f, "member"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "member" => Ok(UserRole::Member),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// Input for registering a new user (before password hashing)
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// Email address
    pub email: String,
    /// Plaintext password (will be hashed)
    pub password: String,
    /// Display name
    pub name: String,
}

impl RegisterInput {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }
}
