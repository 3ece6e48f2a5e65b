//! Talk resource, nested under a camp
//!
//! - `GET    /api/camps/{moniker}/talks`
//! - `GET    /api/camps/{moniker}/talks/{id}`
//! - `POST   /api/camps/{moniker}/talks`
//! - `PUT    /api/camps/{moniker}/talks/{id}`
//! - `DELETE /api/camps/{moniker}/talks/{id}`
//!
//! Talks are always returned with their speaker.

use super::AppState;
use super::extract::ValidatedJson;
use crate::core::entity::TalkId;
use crate::core::error::{ApiError, ApiResult};
use crate::links::TALK_ROUTE;
use crate::models::{TalkModel, TalkUpdate};
use crate::storage::StagedEntity;
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};

fn talk_not_found(moniker: &str, id: TalkId) -> ApiError {
    ApiError::NotFound(format!(
        "Couldn't find any talk {} for the camp {}",
        id, moniker
    ))
}

/// Talks of a camp; an unknown camp yields an empty list
pub async fn list_talks(
    State(state): State<AppState>,
    Path(moniker): Path<String>,
) -> ApiResult<Json<Vec<TalkModel>>> {
    let talks = state.repository().list_talks(&moniker, true).await?;
    Ok(Json(talks.iter().map(TalkModel::from).collect()))
}

pub async fn get_talk(
    State(state): State<AppState>,
    Path((moniker, id)): Path<(String, TalkId)>,
) -> ApiResult<Json<TalkModel>> {
    let talk = state
        .repository()
        .get_talk(&moniker, id, true)
        .await?
        .ok_or_else(|| talk_not_found(&moniker, id))?;

    Ok(Json(TalkModel::from(&talk)))
}

/// Create a talk under an existing camp, given by an existing speaker
///
/// An unknown camp is a `400`, not a `404`: the camp is a precondition of the
/// body, not the addressed resource.
pub async fn create_talk(
    State(state): State<AppState>,
    Path(moniker): Path<String>,
    ValidatedJson(model): ValidatedJson<TalkModel>,
) -> ApiResult<impl IntoResponse> {
    let mut repo = state.repository();

    let camp = repo
        .get_camp(&moniker)
        .await?
        .ok_or_else(|| ApiError::BadRequest(format!("Camp {} doesn't exist", moniker)))?;

    let speaker_id = model
        .speaker_id()
        .ok_or_else(|| ApiError::BadRequest("SpeakerId is required".to_string()))?;

    let speaker = repo
        .get_speaker(speaker_id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Speaker is not found".to_string()))?;

    let key = repo.stage(model.to_talk(&camp, &speaker));

    if !repo.commit().await? {
        return Err(ApiError::BadRequest("Failed to save new Talk".to_string()));
    }

    let mut talk = repo
        .persisted(key)
        .and_then(StagedEntity::as_talk)
        .cloned()
        .ok_or_else(|| ApiError::Internal("committed talk missing from receipt".to_string()))?;

    tracing::info!(
        moniker = %camp.moniker,
        id = talk.id,
        speaker = %speaker.full_name(),
        "talk created"
    );
    talk.assign_speaker(speaker);

    let mut headers = HeaderMap::new();
    let id = talk.id.to_string();
    match state
        .links
        .resolve(TALK_ROUTE, &[("moniker", camp.moniker.as_str()), ("id", id.as_str())])
        .and_then(|location| HeaderValue::from_str(&location).ok())
    {
        Some(location) => {
            headers.insert(header::LOCATION, location);
        }
        None => tracing::warn!(moniker = %camp.moniker, id = talk.id, "no address for created talk"),
    }

    Ok((StatusCode::CREATED, headers, Json(TalkModel::from(&talk))))
}

/// Overlay the body onto a talk
///
/// A speaker reference that does not resolve is ignored: the talk keeps its
/// current speaker and the other fields are still applied.
pub async fn update_talk(
    State(state): State<AppState>,
    Path((moniker, id)): Path<(String, TalkId)>,
    ValidatedJson(update): ValidatedJson<TalkUpdate>,
) -> ApiResult<Json<TalkModel>> {
    let mut repo = state.repository();

    let mut talk = repo
        .get_talk(&moniker, id, true)
        .await?
        .ok_or_else(|| talk_not_found(&moniker, id))?;

    update.apply_to(&mut talk);

    if let Some(speaker_id) = update.speaker_id() {
        match repo.get_speaker(speaker_id).await? {
            Some(speaker) => talk.assign_speaker(speaker),
            None => tracing::debug!(
                speaker_id,
                talk_id = id,
                "replacement speaker not found, keeping current speaker"
            ),
        }
    }

    repo.stage(talk.clone());

    if !repo.commit().await? {
        return Err(ApiError::BadRequest(
            "Failed to update the database".to_string(),
        ));
    }

    Ok(Json(TalkModel::from(&talk)))
}

pub async fn delete_talk(
    State(state): State<AppState>,
    Path((moniker, id)): Path<(String, TalkId)>,
) -> ApiResult<StatusCode> {
    let mut repo = state.repository();

    let talk = repo
        .get_talk(&moniker, id, false)
        .await?
        .ok_or_else(|| talk_not_found(&moniker, id))?;

    repo.stage_delete(talk);

    if !repo.commit().await? {
        return Err(ApiError::BadRequest("Failed to delete talk".to_string()));
    }

    tracing::info!(%moniker, id, "talk deleted");
    Ok(StatusCode::OK)
}
