//! # driftwatch-server
//!
//! Axum HTTP surface over the driftwatch analysis pipeline: request
//! handlers, application state, API error mapping, CORS, and body limits.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
