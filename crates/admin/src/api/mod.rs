//! Content API access.
//!
//! - [`client`]: the shared request wrapper
//! - [`auth`]: login and stored credentials
//! - [`blogs`]: blog CRUD, toggles, bulk actions and image upload

pub mod auth;
pub mod blogs;
pub mod client;
pub mod error;

pub use auth::AuthApi;
pub use blogs::{BlogsApi, BulkAction};
pub use client::{ApiClient, DEFAULT_TIMEOUT, UploadFile};
pub use error::{ApiError, ApiErrorKind};
