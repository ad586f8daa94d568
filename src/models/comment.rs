//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with the commenter's display name, for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
