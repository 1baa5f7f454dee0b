//! Request handlers
//!
//! Organized by domain:
//! - `babies` - Baby profile plumbing (create, list, get)
//! - `events` - Event logging and soft deletion
//! - `insights` - The insights engine surface (reports, anomalies,
//!   predictions)

mod babies;
mod events;
mod insights;

pub use babies::*;
pub use events::*;
pub use insights::*;

use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::CALLER_HEADER;

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Extract the caller id from request headers
///
/// Defaults to "local" for unproxied development use.
pub fn get_caller(headers: &HeaderMap) -> String {
    headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .unwrap_or("local")
        .to_string()
}

/// GET /api/health - liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
