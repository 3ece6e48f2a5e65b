//! Camp resource
//!
//! - `GET    /api/camps?includeTalks=`
//! - `GET    /api/camps/search?theDate=&includeTalks=`
//! - `GET    /api/camps/{moniker}?includeTalks=`
//! - `POST   /api/camps`
//! - `PUT    /api/camps/{moniker}`
//! - `DELETE /api/camps/{moniker}`

use super::AppState;
use super::extract::{ApiQuery, ValidatedJson};
use crate::core::error::{ApiError, ApiResult, StorageError};
use crate::links::CAMP_ROUTE;
use crate::models::day::deserialize_day;
use crate::models::{CampModel, CampUpdate};
use crate::storage::StagedEntity;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `includeTalks` query flag
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncludeTalks {
    pub include_talks: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(deserialize_with = "deserialize_day")]
    pub the_date: NaiveDate,
    #[serde(default)]
    pub include_talks: bool,
}

/// Response for the list camps endpoint
#[derive(Debug, Serialize)]
pub struct CampsResponse {
    pub count: usize,
    pub results: Vec<CampModel>,
}

fn camp_not_found(moniker: &str) -> ApiError {
    ApiError::NotFound(format!("Couldn't find any camp with this moniker {}", moniker))
}

/// List all camps; an empty store is an empty list, never a 404
pub async fn list_camps(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<IncludeTalks>,
) -> ApiResult<Json<CampsResponse>> {
    let camps = state.repository().list_camps(params.include_talks).await?;

    Ok(Json(CampsResponse {
        count: camps.len(),
        results: camps.iter().map(CampModel::from).collect(),
    }))
}

pub async fn get_camp(
    State(state): State<AppState>,
    Path(moniker): Path<String>,
    ApiQuery(params): ApiQuery<IncludeTalks>,
) -> ApiResult<Json<CampModel>> {
    let camp = state
        .repository()
        .get_camp_with_talks(&moniker, params.include_talks)
        .await?
        .ok_or_else(|| camp_not_found(&moniker))?;

    Ok(Json(CampModel::from(&camp)))
}

/// Camps starting on `theDate`; no match is a 404
pub async fn search_camps(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> ApiResult<Json<Vec<CampModel>>> {
    let camps = state
        .repository()
        .list_camps_by_date(params.the_date, params.include_talks)
        .await?;

    if camps.is_empty() {
        return Err(ApiError::NotFound(format!(
            "Couldn't find any camp on {}",
            params.the_date
        )));
    }

    Ok(Json(camps.iter().map(CampModel::from).collect()))
}

/// Create a camp under a moniker nobody uses yet
///
/// Checks run before anything is staged: moniker uniqueness, then whether the
/// moniker yields a usable address.
pub async fn create_camp(
    State(state): State<AppState>,
    ValidatedJson(model): ValidatedJson<CampModel>,
) -> ApiResult<impl IntoResponse> {
    let mut repo = state.repository();

    if repo.get_camp(&model.moniker).await?.is_some() {
        return Err(ApiError::Conflict("Moniker in use".to_string()));
    }

    let location = state
        .links
        .resolve(CAMP_ROUTE, &[("moniker", model.moniker.as_str())])
        .ok_or_else(|| ApiError::BadRequest("Couldn't use current moniker".to_string()))?;

    let key = repo.stage(model.to_camp());

    let committed = match repo.commit().await {
        Ok(committed) => committed,
        // Lost a race against a concurrent create of the same moniker
        Err(StorageError::UniqueViolation { .. }) => {
            return Err(ApiError::Conflict("Moniker in use".to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    if !committed {
        return Err(ApiError::BadRequest("Failed to save new camp".to_string()));
    }

    let camp = repo
        .persisted(key)
        .and_then(StagedEntity::as_camp)
        .ok_or_else(|| ApiError::Internal("committed camp missing from receipt".to_string()))?;

    tracing::info!(moniker = %camp.moniker, id = camp.id, "camp created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CampModel::from(camp)),
    ))
}

/// Overlay the present fields of the body onto the stored camp
pub async fn update_camp(
    State(state): State<AppState>,
    Path(moniker): Path<String>,
    ValidatedJson(update): ValidatedJson<CampUpdate>,
) -> ApiResult<Json<CampModel>> {
    let mut repo = state.repository();

    let mut camp = repo
        .get_camp(&moniker)
        .await?
        .ok_or_else(|| camp_not_found(&moniker))?;

    update.apply_to(&mut camp);
    repo.stage(camp.clone());

    if !repo.commit().await? {
        return Err(ApiError::BadRequest("Failed to update camp".to_string()));
    }

    tracing::info!(moniker = %camp.moniker, "camp updated");
    Ok(Json(CampModel::from(&camp)))
}

pub async fn delete_camp(
    State(state): State<AppState>,
    Path(moniker): Path<String>,
) -> ApiResult<StatusCode> {
    let mut repo = state.repository();

    let camp = repo
        .get_camp(&moniker)
        .await?
        .ok_or_else(|| camp_not_found(&moniker))?;

    repo.stage_delete(camp);

    if !repo.commit().await? {
        return Err(ApiError::BadRequest("Failed to delete".to_string()));
    }

    tracing::info!(%moniker, "camp deleted");
    Ok(StatusCode::OK)
}
