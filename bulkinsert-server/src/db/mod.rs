//! Database layer - gateway trait and the PostgreSQL implementation
//!
//! # Design Principles
//!
//! - One pool and one prepared insert per process, shared by every request
//! - One database transaction per HTTP request
//! - Anything that fails between begin and commit is rolled back

pub mod gateway;
pub mod pool;

pub use gateway::{BatchTransaction, DbError, Gateway};
pub use pool::{DbConfig, PgGateway, StartupError, INSERT_SQL};
