use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::GoalProgress;

use super::validation::{validate_goal_target, validate_goal_year};
use super::{ApiError, AppState, SetGoalRequest, SuccessResponse};

#[derive(Debug, Deserialize)]
pub struct GoalParams {
    pub year: Option<i32>,
}

pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GoalParams>,
) -> Result<Json<Vec<GoalProgress>>, ApiError> {
    Ok(Json(state.store().list_goals(params.year).await?))
}

pub async fn set_goal(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetGoalRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let year = validate_goal_year(request.year)?;
    let target = validate_goal_target(request.target)?;

    state
        .store()
        .set_goal(year, request.media_type, target)
        .await?;

    Ok(Json(SuccessResponse::OK))
}

pub async fn remove_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if !state.store().remove_goal(id).await? {
        return Err(ApiError::not_found("Goal", id));
    }
    Ok(Json(SuccessResponse::OK))
}
