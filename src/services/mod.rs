//! Services layer - Business logic
//!
//! This module contains the business logic for the blog. Services are
//! responsible for:
//! - Implementing business rules
//! - Coordinating between repositories
//! - Handling validation and error cases

pub mod comment;
pub mod password;
pub mod post;
pub mod user;

pub use comment::{CommentService, CommentServiceError};
pub use password::{hash_password, verify_password};
pub use post::{PostService, PostServiceError};
pub use user::{LoginInput, UserService, UserServiceError};
