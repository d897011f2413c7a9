//! Data models
//!
//! Owned by the backend; the client holds transient copies.
//! Field names follow the backend's camelCase JSON.

pub mod access_group;
pub mod report;
pub mod user;

// Re-exports
pub use access_group::*;
pub use report::*;
pub use user::*;
