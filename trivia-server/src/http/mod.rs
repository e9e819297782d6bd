//! HTTP server layer
//!
//! Axum server with:
//! - Permissive CORS on every response
//! - Request tracing
//! - Panics rendered as the 500 envelope
//! - Graceful shutdown

pub mod server;
pub mod error;
pub mod extractors;
pub mod routes;

pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use error::ApiError;
