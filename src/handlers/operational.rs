//! Operational endpoints

use super::AppState;
use crate::core::error::{ApiError, ApiResult};
use axum::{extract::State, http::StatusCode};

/// `OPTIONS /api/operational/reloadconfig`
///
/// Re-reads the configuration file the server was started with. A file that
/// cannot be read or parsed leaves the running configuration in place.
pub async fn reload_config(State(state): State<AppState>) -> ApiResult<StatusCode> {
    match state.config.reload() {
        Ok(_) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::error!(error = %e, "configuration reload failed");
            Err(ApiError::Internal("Failed to reload configuration".to_string()))
        }
    }
}
