//! Post model
//!
//! This module provides:
//! - `Post` entity representing a blog post
//! - Input types for creating and updating posts
//!
//! The `date` field is the human-readable display date stamped when the
//! post is created (e.g. "August 30, 2026"), kept as a plain string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Post title (unique)
    pub title: String,
    /// Subtitle shown under the title
    pub subtitle: String,
    /// Free-text body
    pub body: String,
    /// Header image URL
    pub image_url: String,
    /// Display date string, stamped at creation
    pub date: String,
    /// Author user ID
    pub author_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with the given parameters
    pub fn new(
        title: String,
        subtitle: String,
        body: String,
        image_url: String,
        date: String,
        author_id: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            title,
            subtitle,
            body,
            image_url,
            date,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a new post
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostInput {
    /// Post title (must be unique)
    pub title: String,
    /// Subtitle
    pub subtitle: String,
    /// Free-text body
    pub body: String,
    /// Header image URL
    pub image_url: String,
}

/// Input for updating a post; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostInput {
    /// New title (optional, must stay unique)
    pub title: Option<String>,
    /// New subtitle (optional)
    pub subtitle: Option<String>,
    /// New body (optional)
    pub body: Option<String>,
    /// New image URL (optional)
    pub image_url: Option<String>,
}

impl UpdatePostInput {
    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.body.is_none()
            && self.image_url.is_none()
    }
}
