//! Gateway abstraction between the HTTP handler and the database
//!
//! The handler only sees these traits, so tests can swap in an in-memory
//! implementation without a running PostgreSQL.

use async_trait::async_trait;

use crate::models::Transaction;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owner of the connection pool and the prepared insert.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Open a database transaction for one batch.
    async fn begin(&self) -> Result<Box<dyn BatchTransaction>, DbError>;
}

/// An open database transaction bound to the prepared insert.
///
/// Dropping it without calling `commit` or `rollback` leaves cleanup to the
/// driver; callers are expected to finish it explicitly.
#[async_trait]
pub trait BatchTransaction: Send {
    /// Insert one record with the prepared statement.
    async fn insert(&mut self, record: &Transaction) -> Result<(), DbError>;

    async fn commit(self: Box<Self>) -> Result<(), DbError>;

    async fn rollback(self: Box<Self>) -> Result<(), DbError>;
}
