//! Core desk components
//!
//! - Desk: gateway + dispatcher, the surface a GUI binds to
//! - Dispatcher: background requests with per-key supersede
//! - DeskConfig / LogConfig: environment-driven configuration
//! - DeskError: error type with user-facing messages

pub mod config;
pub mod desk;
pub mod dispatch;
pub mod error;
pub mod logger;

pub use config::DeskConfig;
pub use desk::Desk;
pub use dispatch::{Dispatcher, RequestKey, UiEvent, UiEvents};
pub use error::{DeskError, DeskResult};
pub use logger::{LogConfig, init_logger};
