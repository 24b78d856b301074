//! bulkinsert-server: HTTP bulk-insert endpoint
//!
//! Accepts a batch of transaction records as JSON on `POST /bulkinsert` and
//! inserts them into PostgreSQL inside a single database transaction.

pub mod db;
pub mod http;
pub mod models;

pub use db::{DbConfig, DbError, Gateway, PgGateway, StartupError};
pub use http::{router, run_server, AppState, ServerConfig};
pub use models::{BulkInsertRequest, Transaction};
