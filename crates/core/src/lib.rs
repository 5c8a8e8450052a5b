//! AiGENThix Core - Shared types library.
//!
//! This crate provides common types used across all AiGENThix components:
//! - `admin` - Content-management panel over the content API
//! - `website` - Public marketing site and blog reader
//! - `cli` - Command-line front end for the admin API
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The optional `http` feature adds the one middleware both
//! servers share. Both front ends talk to the same content API, so the records it
//! returns and the rules for reading its response envelope live here.
//!
//! # Modules
//!
//! - [`types`] - IDs, email, auth records, blog records and the response envelope
//! - `http` - request correlation middleware (feature `http`)

#![cfg_attr(not(test), forbid(unsafe_code))]

#[cfg(feature = "http")]
pub mod http;
pub mod types;

pub use types::*;
