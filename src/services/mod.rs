//! Web service for the read-only speed API.
//!
//! This module provides optional network reporting for the tachometer:
//! the `web` feature enables an axum-based HTTP server exposing the current
//! motor speeds as JSON.
//!
//! The API is strictly read-only - the tachometer measures, it does not
//! command. Every endpoint is a polling surface over the same atomic speed
//! words the display and logger read.
//!
//! # Shared State Pattern
//!
//! All reporting surfaces share one [`SharedTachoState`]:
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_tacho::services::SharedTachoState;
//!
//! let state = Arc::new(SharedTachoState::new(tachometer));
//!
//! // Web handlers read snapshots
//! let router = build_router(Arc::clone(&state), &web_config);
//!
//! // A logger polls the same state
//! let snapshot = state.snapshot();
//! ```

pub mod api;
pub mod shared;
pub mod web;

// Re-exports
pub use api::*;
pub use shared::*;
pub use web::*;
