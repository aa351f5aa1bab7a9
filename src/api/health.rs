//! Health check endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{config::BackendKind, error::AppResult, repository::StorageBackend, AppState};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
    /// Storage backend serving the library
    pub backend: StorageBackend,
    /// Configured database URL or library file path
    pub storage: String,
}

impl HealthResponse {
    fn new(status: &str, state: &AppState) -> Self {
        let storage = &state.config.storage;
        let location = match storage.backend {
            BackendKind::Sqlite => storage.database_url.clone(),
            BackendKind::Json => storage.json_path.clone(),
        };
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            backend: state.services.library.backend(),
            storage: location,
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy", &state))
}

/// Readiness check endpoint (checks storage is reachable)
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 500, description = "Storage unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    state.services.library.statistics().await?;
    Ok(Json(HealthResponse::new("ready", &state)))
}
