//! Insights engine handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use sprout_core::{AnomalyReport, InsightReport, Period, SleepPatternReport};

use super::get_caller;
use crate::{AppError, AppState};

/// Query parameters for the insight report
#[derive(Debug, Deserialize)]
pub struct InsightQuery {
    /// Report granularity (daily, weekly, monthly, yearly)
    #[serde(default = "default_period")]
    pub period: String,
    /// Pin the window end (ISO-8601); defaults to now
    pub end: Option<DateTime<Utc>>,
}

fn default_period() -> String {
    "weekly".to_string()
}

/// GET /api/babies/:id/insights - Full period insight report
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(baby_id): Path<i64>,
    Query(params): Query<InsightQuery>,
) -> Result<Json<InsightReport>, AppError> {
    let period: Period = params
        .period
        .parse()
        .map_err(|e: String| AppError::bad_request(&e))?;
    let caller = get_caller(&headers);

    let report = state
        .engine
        .report(baby_id, &caller, period, params.end)
        .await?;
    Ok(Json(report))
}

/// GET /api/babies/:id/anomalies - Anomaly detection over the last day
pub async fn get_anomalies(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(baby_id): Path<i64>,
) -> Result<Json<AnomalyReport>, AppError> {
    let caller = get_caller(&headers);
    let report = state.engine.anomaly_report(baby_id, &caller).await?;
    Ok(Json(report))
}

/// GET /api/babies/:id/predictions/sleep - Next-sleep prediction
pub async fn get_sleep_prediction(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(baby_id): Path<i64>,
) -> Result<Json<SleepPatternReport>, AppError> {
    let caller = get_caller(&headers);
    let report = state.engine.sleep_pattern(baby_id, &caller).await?;
    Ok(Json(report))
}
