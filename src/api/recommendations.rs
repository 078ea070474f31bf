use axum::{Json, extract::State};
use std::sync::Arc;

use crate::models::Constraints;

use super::validation::validate_non_empty;
use super::{ApiError, AppState, AskRequest, RecommendationResponse};

pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let query = validate_non_empty("query", &request.query)?;

    let constraints = Constraints {
        media_types: request.media_types,
        min_year: request.min_year,
    };

    let recommendations = state
        .recommendation_service()
        .ask(query, &constraints)
        .await?;

    Ok(Json(RecommendationResponse { recommendations }))
}

pub async fn surprise(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let recommendations = state.recommendation_service().surprise().await?;

    Ok(Json(RecommendationResponse { recommendations }))
}
