use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::db::WishlistItem;

use super::validation::validate_non_empty;
use super::{AddResponse, AddWishlistRequest, ApiError, AppState, SuccessResponse};

pub async fn list_wishlist(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WishlistItem>>, ApiError> {
    Ok(Json(state.store().list_wishlist().await?))
}

pub async fn add_wishlist_item(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddWishlistRequest>,
) -> Result<Json<AddResponse>, ApiError> {
    let title = validate_non_empty("title", &request.title)?;

    let added = state
        .store()
        .add_wishlist_item(title, request.media_type, request.notes.as_deref())
        .await?;

    Ok(Json(AddResponse {
        success: true,
        added,
    }))
}

pub async fn remove_wishlist_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if !state.store().remove_wishlist_item(id).await? {
        return Err(ApiError::not_found("Wishlist item", id));
    }
    Ok(Json(SuccessResponse::OK))
}
