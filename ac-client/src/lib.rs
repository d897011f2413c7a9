//! Reporting backend client
//!
//! Session state, the permission gate and the HTTP gateway to the
//! incident-reporting REST backend.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod permission;
pub mod session;
pub mod token;

pub use api::{Gateway, GatewayClient, LoginOutcome, PatchBody};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorCategory};
pub use http::NetworkHttpClient;
pub use permission::{ACCESS_REQUEST_MESSAGE, Capability, Group, Permissions, Screen};
pub use session::{Session, SharedSession};

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, TokenClaims};
pub use shared::response::{ApiResponse, ResponseStatus};
