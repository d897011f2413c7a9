//! Shared types for the anti-corruption desk client
//!
//! Wire types exchanged with the reporting backend: the response
//! envelope, auth DTOs, and the report / user / access-group models.

pub mod client;
pub mod models;
pub mod response;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{AccessGroup, NewReport, Report, ReportFilter, ReportStatus, User};
pub use response::{ApiResponse, ResponseStatus};
