//! HTTP route handlers for the website.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /blog                   - Featured, latest and popular posts
//! GET  /blog/{slug}            - One post with related posts
//! GET  /sign-in                - Sign-in form description
//! GET  /create-account         - Sign-up form description
//! ```

pub mod account;
pub mod blog;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blog", get(blog::index))
        .route("/blog/{slug}", get(blog::show))
        .route("/sign-in", get(account::sign_in))
        .route("/create-account", get(account::create_account))
}
