//! HTTP server layer
//!
//! Axum server with:
//! - `POST /bulkinsert`
//! - Request tracing
//! - Graceful shutdown
//! - Plain-text error bodies carrying the underlying error message

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{router, run_server, AppState, ServerConfig, ServerError};
