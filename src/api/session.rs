//! Session persistence endpoints: explicit save, reload and exit

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, repository::LoadOutcome, AppState};

#[derive(Serialize, ToSchema)]
pub struct ReloadResponse {
    pub outcome: LoadOutcome,
}

/// Persist the library now
#[utoipa::path(
    post,
    path = "/session/save",
    tag = "session",
    responses(
        (status = 204, description = "Library saved")
    )
)]
pub async fn save(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.services.library.save().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reload the library from storage, discarding unsaved changes
#[utoipa::path(
    post,
    path = "/session/reload",
    tag = "session",
    responses(
        (status = 200, description = "Load result", body = ReloadResponse)
    )
)]
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let outcome = state.services.library.reload().await?;
    Ok(Json(ReloadResponse { outcome }))
}

/// Save the library and end the session
#[utoipa::path(
    post,
    path = "/session/exit",
    tag = "session",
    responses(
        (status = 204, description = "Session ended")
    )
)]
pub async fn exit(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.services.library.exit_session().await?;
    Ok(StatusCode::NO_CONTENT)
}
