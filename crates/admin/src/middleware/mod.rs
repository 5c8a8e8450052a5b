//! HTTP middleware stack for the admin panel.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span)
//! 3. Request ID
//! 4. Security headers
//! 5. Route guard (cookie presence)

pub mod guard;
pub mod security_headers;

pub use guard::{AuthCookie, GuardDecision, RequireToken, route_guard};
pub use aigenthix_core::http::request_id_middleware;
pub use security_headers::security_headers_middleware;
