//! Baby profile handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use sprout_core::models::{Baby, NewBaby};

use super::get_caller;
use crate::{AppError, AppState};

/// Response for baby creation
#[derive(Debug, Serialize)]
pub struct CreatedBaby {
    pub id: i64,
}

/// POST /api/babies - Create a baby profile
///
/// The creating caller is granted caregiver access automatically.
pub async fn create_baby(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewBaby>,
) -> Result<Json<CreatedBaby>, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("Baby name must not be empty"));
    }

    let caller = get_caller(&headers);
    let id = state.db.insert_baby(&body)?;
    state.db.grant_access(id, &caller)?;

    tracing::info!(baby_id = id, caller = %caller, "Baby profile created");
    Ok(Json(CreatedBaby { id }))
}

/// GET /api/babies - List baby profiles the caller may read
pub async fn list_babies(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Baby>>, AppError> {
    let caller = get_caller(&headers);
    let babies = state
        .db
        .list_babies()?
        .into_iter()
        .filter(|b| state.db.caller_has_access(b.id, &caller).unwrap_or(false))
        .collect();
    Ok(Json(babies))
}

/// GET /api/babies/:id - Get one baby profile
pub async fn get_baby(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Baby>, AppError> {
    let caller = get_caller(&headers);
    if !state.db.caller_has_access(id, &caller)? {
        return Err(AppError::forbidden("Access denied"));
    }
    let baby = state
        .db
        .get_baby(id)?
        .ok_or_else(|| AppError::not_found("Baby not found"))?;
    Ok(Json(baby))
}
