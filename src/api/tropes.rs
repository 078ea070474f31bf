use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::db::TropePreference;
use crate::domain::TropeAffinity;

use super::validation::validate_non_empty;
use super::{ApiError, AppState, ReplaceTropesRequest, SetTropeRequest, SuccessResponse};

fn parse_entry(request: &SetTropeRequest) -> Result<(String, TropeAffinity), ApiError> {
    let trope = validate_non_empty("trope", &request.trope)?;
    let affinity = request
        .affinity
        .parse::<TropeAffinity>()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok((trope.to_string(), affinity))
}

pub async fn list_tropes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TropePreference>>, ApiError> {
    Ok(Json(state.store().list_tropes().await?))
}

pub async fn set_trope(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetTropeRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let (trope, affinity) = parse_entry(&request)?;
    state.store().set_trope(&trope, affinity).await?;
    Ok(Json(SuccessResponse::OK))
}

/// Replaces the whole preference set in one shot. Every entry is parsed
/// before anything is written, so a bad affinity leaves the table alone.
pub async fn replace_tropes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReplaceTropesRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let entries = request
        .tropes
        .iter()
        .map(parse_entry)
        .collect::<Result<Vec<_>, _>>()?;

    state.store().replace_tropes(&entries).await?;
    Ok(Json(SuccessResponse::OK))
}

pub async fn remove_trope(
    State(state): State<Arc<AppState>>,
    Path(trope): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if !state.store().remove_trope(&trope).await? {
        return Err(ApiError::not_found("Trope", trope));
    }
    Ok(Json(SuccessResponse::OK))
}
