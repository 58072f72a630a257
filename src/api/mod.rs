//! HTTP API for the financial health dashboard.
//!
//! # Endpoints
//!
//! - `GET /health` - liveness check
//! - `GET /financial-health` - current [`HealthReport`]
//!
//! # Features
//!
//! - `rpc-server`: Enables this module (requires async runtime)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::error::Error;
use crate::health::{ErpDataSource, HealthReport, HealthService};

// ═══════════════════════════════════════════════════════════════════════════════
// SERVER STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Health score service
    pub health: HealthService,
}

impl AppState {
    /// Create state over a data source
    pub fn new(source: Arc<dyn ErpDataSource>) -> Self {
        Self {
            health: HealthService::new(source),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// API TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Body returned with every error status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error message
    pub error: String,
    /// Numeric error code
    pub code: u32,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            code: err.code(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if !self.is_client_error() {
            error!(
                code = self.code(),
                critical = self.is_critical(),
                "Request failed: {}",
                self
            );
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HANDLERS
// ═══════════════════════════════════════════════════════════════════════════════

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "bizpulse-server",
        "version": crate::VERSION
    }))
}

/// GET /financial-health - Financial health report
async fn get_financial_health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthReport>, Error> {
    let service = state.health.clone();

    // scoring reads from a blocking store
    let report = tokio::task::spawn_blocking(move || service.financial_health())
        .await
        .map_err(|e| Error::Internal(format!("Scoring task failed: {}", e)))??;

    Ok(Json(report))
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/financial-health", get(get_financial_health))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let response = Error::FinancialDataNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = Error::InvariantViolation("sum".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_client_errors_map_to_4xx() {
        let errors = [
            Error::FinancialDataNotFound,
            Error::InvalidParameter { name: "month".into(), reason: "empty".into() },
            Error::Storage("disk".into()),
            Error::Lock,
            Error::Internal("boom".into()),
        ];
        for err in errors {
            let client = err.is_client_error();
            let status = err.into_response().status();
            assert_eq!(status.is_client_error(), client);
            assert_eq!(status.is_server_error(), !client);
        }
    }

    #[test]
    fn test_error_body() {
        let body = serde_json::to_value(ErrorResponse::from(&Error::FinancialDataNotFound)).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], 1001);
        assert_eq!(body["error"], "Financial data not found");
    }
}
