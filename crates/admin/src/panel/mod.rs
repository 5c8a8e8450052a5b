//! Page-level state containers.
//!
//! Each container wraps one API namespace and tracks loading, error and data
//! the way a page renders them.

pub mod blogs;
pub mod session;

pub use blogs::{BlogDetailState, BlogFilter, BlogListState, BlogMutations, DashboardStats};
pub use session::AuthSession;
