//! Services that talk to the content API.

pub mod blog;

pub use blog::{BlogService, BlogServiceError};
