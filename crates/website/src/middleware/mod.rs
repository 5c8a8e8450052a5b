//! HTTP middleware for the website.

pub mod security_headers;

pub use aigenthix_core::http::request_id_middleware;
pub use security_headers::security_headers_middleware;
