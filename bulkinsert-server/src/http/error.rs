//! Handler error type with IntoResponse
//!
//! Bodies are plain text: the decoder's or the database's own message,
//! unredacted.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::db::DbError;

/// Failure of one bulk-insert request
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body did not decode (400)
    #[error("{0}")]
    Decode(#[source] serde_json::Error),

    /// Could not open a database transaction (500)
    #[error("{0}")]
    Begin(#[source] DbError),

    /// Insert of the record at `index` failed (500)
    #[error("{source}")]
    Insert { index: usize, source: DbError },

    /// Commit failed (500)
    #[error("{0}")]
    Commit(#[source] DbError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Begin(_) | Self::Insert { .. } | Self::Commit(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Decode(e) => tracing::warn!("Rejected request body: {}", e),
            Self::Begin(e) => tracing::error!("Failed to begin transaction: {}", e),
            Self::Insert { index, source } => {
                tracing::error!(index, "Insert failed: {}", source)
            }
            Self::Commit(e) => tracing::error!("Commit failed: {}", e),
        }

        (status, self.to_string()).into_response()
    }
}
