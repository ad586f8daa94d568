//! Static site pages
//!
//! JSON stand-ins for the blog's fixed pages:
//! - GET /api/v1/site/about
//! - GET /api/v1/site/contact

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::AppState;

/// Response for a static page
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub title: String,
    pub body: String,
}

/// Build the site router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(about))
        .route("/contact", get(contact))
}

/// GET /api/v1/site/about - About page
async fn about() -> Json<PageResponse> {
    Json(PageResponse {
        title: "About Me".to_string(),
        body: "This is what I do.".to_string(),
    })
}

/// GET /api/v1/site/contact - Contact page
async fn contact() -> Json<PageResponse> {
    Json(PageResponse {
        title: "Contact Me".to_string(),
        body: "Have questions? I have answers.".to_string(),
    })
}
