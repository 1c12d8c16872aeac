//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub cache: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let status = database_status(&state).await;

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database: state.storage.database,
        cache: state.storage.cache,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if status == "ok" {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[cfg(feature = "postgres")]
async fn database_status(state: &AppState) -> &'static str {
    let Some(db) = &state.db else {
        return "ok";
    };
    match db.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            "degraded"
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn database_status(_state: &AppState) -> &'static str {
    "ok"
}
