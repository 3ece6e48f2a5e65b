//! Read-only speaker lookup
//!
//! Speakers are managed outside this API; talks only reference them.

use super::AppState;
use crate::core::entity::SpeakerId;
use crate::core::error::{ApiError, ApiResult};
use crate::models::SpeakerModel;
use axum::{
    Json,
    extract::{Path, State},
};

pub async fn list_speakers(State(state): State<AppState>) -> ApiResult<Json<Vec<SpeakerModel>>> {
    let speakers = state.repository().list_speakers().await?;
    Ok(Json(speakers.iter().map(SpeakerModel::from).collect()))
}

pub async fn get_speaker(
    State(state): State<AppState>,
    Path(id): Path<SpeakerId>,
) -> ApiResult<Json<SpeakerModel>> {
    let speaker = state
        .repository()
        .get_speaker(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Couldn't find any speaker with id {}", id)))?;

    Ok(Json(SpeakerModel::from(&speaker)))
}
