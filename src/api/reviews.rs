use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::db::Review;

use super::validation::{validate_non_empty, validate_rating};
use super::{ApiError, AppState, SaveReviewRequest, SuccessResponse};

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.store().list_reviews().await?))
}

pub async fn save_review(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveReviewRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let title = validate_non_empty("title", &request.title)?;
    let media_id = validate_non_empty("mediaId", &request.media_id)?;
    let rating = validate_rating(request.rating)?;

    state
        .store()
        .save_review(
            request.media_type,
            media_id,
            title,
            rating,
            request.body.as_deref(),
        )
        .await?;

    Ok(Json(SuccessResponse::OK))
}

pub async fn remove_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if !state.store().remove_review(id).await? {
        return Err(ApiError::not_found("Review", id));
    }
    Ok(Json(SuccessResponse::OK))
}
