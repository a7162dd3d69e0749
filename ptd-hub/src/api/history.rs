//! Audit trail endpoint

use axum::extract::State;
use axum::Json;
use ptd_common::model::EditHistory;

use crate::api::ApiError;
use crate::AppState;

/// GET /api/history
///
/// The full audit trail, newest first. Entries are immutable; there is no
/// pagination because the trail is bounded by coordinator activity.
pub async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<EditHistory>>, ApiError> {
    let entries = state.store.load_history().await?;
    Ok(Json(entries))
}
