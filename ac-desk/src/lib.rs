//! Anti-corruption reporting desk
//!
//! Headless desk shell over the reporting backend: forms and their
//! validation, partial-update construction, per-screen view-models and a
//! dispatcher that runs requests in the background and hands results to
//! the UI thread.
//!
//! ```text
//! GUI ── start_*() ──► Desk ──► commands ──► ac_client::Gateway ──► backend
//!  ▲                    │
//!  └──── UiEvents ◄─────┘ (DeskEvent)
//! ```

pub use ac_client;
pub use shared;

pub mod commands;
pub mod core;
pub mod events;
pub mod forms;
pub mod views;

pub use crate::core::{
    Desk, DeskConfig, DeskError, DeskResult, LogConfig, RequestKey, UiEvent, UiEvents, init_logger,
};
pub use events::DeskEvent;
pub use forms::{changeset, validation};
