//! Desk commands
//!
//! One async function per user action. Each checks the permission gate
//! locally, then calls the gateway.

pub mod auth;
pub mod reports;
pub mod users;
