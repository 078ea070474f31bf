use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::db::DismissedItem;

use super::validation::validate_non_empty;
use super::{AddDismissedRequest, AddResponse, ApiError, AppState, SuccessResponse};

pub async fn list_dismissed(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DismissedItem>>, ApiError> {
    Ok(Json(state.store().list_dismissed().await?))
}

pub async fn add_dismissed(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddDismissedRequest>,
) -> Result<Json<AddResponse>, ApiError> {
    let title = validate_non_empty("title", &request.title)?;

    let added = state
        .store()
        .add_dismissed(title, request.media_type, request.reason.as_deref())
        .await?;

    Ok(Json(AddResponse {
        success: true,
        added,
    }))
}

pub async fn remove_dismissed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if !state.store().remove_dismissed(id).await? {
        return Err(ApiError::not_found("Dismissed entry", id));
    }
    Ok(Json(SuccessResponse::OK))
}
