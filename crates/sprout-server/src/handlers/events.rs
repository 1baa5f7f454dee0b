//! Event logging handlers
//!
//! Event records are immutable; corrections are a soft delete plus a fresh
//! insert. Every route checks caregiver access before touching the store.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use sprout_core::models::{
    NewActivity, NewDiaperChange, NewFeeding, NewGrowthMeasurement, NewSleepSession,
};

use super::{get_caller, SuccessResponse};
use crate::{AppError, AppState};

/// Response for event creation
#[derive(Debug, Serialize)]
pub struct CreatedEvent {
    pub id: i64,
}

fn check_access(state: &AppState, baby_id: i64, headers: &HeaderMap) -> Result<(), AppError> {
    let caller = get_caller(headers);
    if !state.db.caller_has_access(baby_id, &caller)? {
        return Err(AppError::forbidden("Access denied"));
    }
    Ok(())
}

/// POST /api/babies/:id/events/sleep - Log a sleep session
pub async fn log_sleep(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(baby_id): Path<i64>,
    Json(body): Json<NewSleepSession>,
) -> Result<Json<CreatedEvent>, AppError> {
    check_access(&state, baby_id, &headers)?;
    let id = state.db.insert_sleep_session(baby_id, &body)?;
    Ok(Json(CreatedEvent { id }))
}

/// POST /api/babies/:id/events/feeding - Log a feeding
pub async fn log_feeding(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(baby_id): Path<i64>,
    Json(body): Json<NewFeeding>,
) -> Result<Json<CreatedEvent>, AppError> {
    check_access(&state, baby_id, &headers)?;
    let id = state.db.insert_feeding(baby_id, &body)?;
    Ok(Json(CreatedEvent { id }))
}

/// POST /api/babies/:id/events/diaper - Log a diaper change
pub async fn log_diaper(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(baby_id): Path<i64>,
    Json(body): Json<NewDiaperChange>,
) -> Result<Json<CreatedEvent>, AppError> {
    check_access(&state, baby_id, &headers)?;
    let id = state.db.insert_diaper_change(baby_id, &body)?;
    Ok(Json(CreatedEvent { id }))
}

/// POST /api/babies/:id/events/growth - Log a growth measurement
pub async fn log_growth(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(baby_id): Path<i64>,
    Json(body): Json<NewGrowthMeasurement>,
) -> Result<Json<CreatedEvent>, AppError> {
    check_access(&state, baby_id, &headers)?;
    let id = state.db.insert_growth_measurement(baby_id, &body)?;
    Ok(Json(CreatedEvent { id }))
}

/// POST /api/babies/:id/events/activity - Log an activity
pub async fn log_activity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(baby_id): Path<i64>,
    Json(body): Json<NewActivity>,
) -> Result<Json<CreatedEvent>, AppError> {
    check_access(&state, baby_id, &headers)?;
    if body.duration_minutes < 0 {
        return Err(AppError::bad_request("Duration must not be negative"));
    }
    let id = state.db.insert_activity(baby_id, &body)?;
    Ok(Json(CreatedEvent { id }))
}

/// DELETE /api/events/:category/:id - Soft-delete an event
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path((category, id)): Path<(String, i64)>,
) -> Result<Json<SuccessResponse>, AppError> {
    let deleted = state.db.soft_delete_event(&category, id)?;
    if !deleted {
        return Err(AppError::not_found("Event not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
