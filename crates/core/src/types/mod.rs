//! Core types for AiGENThix.
//!
//! This module provides type-safe wrappers for the content API's records.

pub mod auth;
pub mod blog;
pub mod email;
pub mod envelope;
pub mod id;

pub use auth::{AuthToken, LoginRequest, LoginResponse, User};
pub use blog::{
    Blog, BlogCreated, BlogFormData, BlogFormError, BlogListItem, BlogPageData, BlogUpdated,
    BulkAffected, BulkIds, Category, CtaPosition, CtaStyle, FeaturedToggled, PublishToggled,
    UploadedImage,
};
pub use email::{Email, EmailError};
pub use envelope::{Envelope, EnvelopeRejection, string_field};
pub use id::*;
