//! HTTP front end of the support agent
//!
//! Exposes the per-session turn handler and ticket-flow status over JSON,
//! plus health and Prometheus metrics endpoints.

pub mod http;
pub mod state;

pub use http::{build_app, ServerError};
pub use state::{build_state, AppState};
