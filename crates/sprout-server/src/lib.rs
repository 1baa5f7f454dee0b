//! Sprout Web Server
//!
//! Axum-based REST API for the Sprout baby tracking application.
//!
//! Caller identity arrives in the `x-sprout-caller` header (the deployment's
//! auth proxy is expected to set it); every insight route runs the caregiver
//! access check in the core engine. Responses are sanitized: internal errors
//! never leak details to the client.

use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use sprout_core::db::Database;
use sprout_core::{AIClient, Error as CoreError, InsightEngine};

mod handlers;

#[cfg(test)]
mod tests;

/// Header carrying the authenticated caller id
pub const CALLER_HEADER: &str = "x-sprout-caller";

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub engine: InsightEngine,
    pub config: ServerConfig,
}

/// Build the application router
pub fn create_router(
    db: Database,
    engine: InsightEngine,
    config: ServerConfig,
) -> Router {
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    };

    let state = Arc::new(AppState { db, engine, config });

    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/babies",
            get(handlers::list_babies).post(handlers::create_baby),
        )
        .route("/api/babies/:id", get(handlers::get_baby))
        .route("/api/babies/:id/insights", get(handlers::get_insights))
        .route("/api/babies/:id/anomalies", get(handlers::get_anomalies))
        .route(
            "/api/babies/:id/predictions/sleep",
            get(handlers::get_sleep_prediction),
        )
        .route("/api/babies/:id/events/sleep", post(handlers::log_sleep))
        .route(
            "/api/babies/:id/events/feeding",
            post(handlers::log_feeding),
        )
        .route("/api/babies/:id/events/diaper", post(handlers::log_diaper))
        .route("/api/babies/:id/events/growth", post(handlers::log_growth))
        .route(
            "/api/babies/:id/events/activity",
            post(handlers::log_activity),
        )
        .route(
            "/api/events/:category/:id",
            delete(handlers::delete_event),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the server until shutdown
pub async fn serve(
    db: Database,
    ai: Option<AIClient>,
    config: ServerConfig,
    host: &str,
    port: u16,
    cache_enabled: bool,
) -> anyhow::Result<()> {
    let mut engine = InsightEngine::from_database(db.clone());
    if cache_enabled {
        engine = engine.with_cache(Arc::new(sprout_core::MemoryCache::new()));
    }
    match ai {
        Some(client) => {
            use sprout_core::AIBackend;
            info!(model = client.model(), host = client.host(), "AI backend configured");
            engine = engine.with_ai(client);
        }
        None => {
            info!("AI backend not configured (set OLLAMA_HOST to enable narratives)");
        }
    }

    let app = create_router(db, engine, config);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Sprout server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn forbidden(msg: &str) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AccessDenied(_) => Self {
                status: StatusCode::FORBIDDEN,
                message: "Access denied".to_string(),
                internal: None,
            },
            CoreError::NotFound(ref what) => Self {
                status: StatusCode::NOT_FOUND,
                message: format!("Not found: {}", what),
                internal: None,
            },
            CoreError::InvalidData(ref msg) => Self {
                status: StatusCode::BAD_REQUEST,
                message: msg.clone(),
                internal: None,
            },
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(other.into()),
            },
        }
    }
}
