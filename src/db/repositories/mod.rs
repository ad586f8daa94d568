//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles row-level operations for a specific entity.

pub mod comment;
pub mod post;
pub mod session;
pub mod user;

pub use comment::{CommentRepository, SqlxCommentRepository};
pub use post::{PostRepository, SqlxPostRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use user::{SqlxUserRepository, UserRepository};
