//! Bulk insert endpoint
//!
//! `POST /bulkinsert` decodes the body, opens one database transaction,
//! inserts every record in order and commits. Any failure after the
//! transaction is opened rolls it back before the error is returned.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::Router;

use crate::db::BatchTransaction;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::BulkInsertRequest;

/// Body returned when every record was committed.
pub const SUCCESS_BODY: &str = "Data inserted successfully!";

/// POST /bulkinsert
async fn bulk_insert(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let req = BulkInsertRequest::from_json(&body).map_err(ApiError::Decode)?;

    let mut tx = state.gateway().begin().await.map_err(ApiError::Begin)?;

    for (index, record) in req.data.iter().enumerate() {
        if let Err(source) = tx.insert(record).await {
            rollback(tx, req.request_id).await;
            return Err(ApiError::Insert { index, source });
        }
    }

    tx.commit().await.map_err(ApiError::Commit)?;

    tracing::info!(
        request_id = req.request_id,
        records = req.data.len(),
        "Bulk insert committed"
    );
    Ok(SUCCESS_BODY)
}

/// Roll back after a failed insert. A rollback error is only logged so the
/// caller still sees the insert error.
async fn rollback(tx: Box<dyn BatchTransaction>, request_id: i64) {
    if let Err(e) = tx.rollback().await {
        tracing::error!(request_id, "Rollback failed: {}", e);
    }
}

/// Bulk insert routes
pub fn router() -> Router<AppState> {
    Router::new().route("/bulkinsert", post(bulk_insert))
}
