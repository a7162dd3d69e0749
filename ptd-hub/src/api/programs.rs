//! Program endpoints: list, create, partial update.
//!
//! The update path: diff the payload against the last snapshot, merge,
//! persist the program, then append the audit entries one at a time. There is
//! no transaction across the program write and its history appends; a failure
//! partway leaves the already-written entries in place.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use ptd_common::audit;
use ptd_common::model::{NewProgram, Program};
use ptd_common::session::SessionContext;
use ptd_common::{time, Error};
use serde_json::Value;
use tracing::{error, info};

use crate::api::ApiError;
use crate::AppState;

/// GET /api/programs
///
/// The full, sanitized programs collection.
pub async fn list_programs(
    State(state): State<AppState>,
) -> Result<Json<Vec<Program>>, ApiError> {
    let programs = state.store.load_programs().await?;
    Ok(Json(programs))
}

/// POST /api/programs
///
/// Create a program from a partial seed: timestamp-derived id, defaulted
/// fields, checklists from the fixed templates. Coordinator only.
pub async fn create_program(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(seed): Json<NewProgram>,
) -> Result<(StatusCode, Json<Program>), ApiError> {
    require_coordinator(&session)?;

    let program = Program::create(seed, time::now());
    state.store.write_program(&program).await?;
    info!("program {} created by {}", program.id, session.usuario);

    Ok((StatusCode::CREATED, Json(program)))
}

/// PUT /api/programs/:id
///
/// Partial update through the audit-diff pipeline. Coordinator only.
pub async fn update_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(session): Extension<SessionContext>,
    Json(payload): Json<Value>,
) -> Result<Json<Program>, ApiError> {
    require_coordinator(&session)?;

    let Some(updates) = payload.as_object() else {
        return Err(ApiError::bad_request("update payload must be a JSON object"));
    };

    let programs = state.store.load_programs().await?;
    let old = programs
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| Error::NotFound(format!("program {}", id)))?;

    let outcome = audit::apply_update(old, updates, &session, time::now())?;

    state.store.write_program(&outcome.program).await?;

    // One at a time, no rollback: entries written before a failure stay.
    for draft in outcome.entries {
        if let Err(e) = state.store.append_history(draft).await {
            error!("history append failed for program {}: {}", id, e);
            return Err(e.into());
        }
    }

    Ok(Json(outcome.program))
}

fn require_coordinator(session: &SessionContext) -> Result<(), ApiError> {
    if session.can_edit() {
        Ok(())
    } else {
        Err(ApiError::forbidden("coordinator role required"))
    }
}
