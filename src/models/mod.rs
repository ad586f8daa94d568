//! Data models
//!
//! This module contains all data structures used throughout Inkpost.
//! Models represent:
//! - Database entities (User, Post, Comment, Session)
//! - Input types for create and update operations

mod comment;
mod post;
mod session;
mod user;

pub use comment::{Comment, CommentWithAuthor};
pub use post::{CreatePostInput, Post, UpdatePostInput};
pub use session::Session;
pub use user::{RegisterInput, User, UserRole};
