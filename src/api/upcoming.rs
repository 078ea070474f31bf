use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::services::UpcomingSchedule;

use super::{ApiError, AppState, ForceRefreshResponse};

#[derive(Debug, Deserialize)]
pub struct UpcomingParams {
    #[serde(default)]
    pub refresh: bool,
}

pub async fn list_upcoming(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UpcomingParams>,
) -> Result<Json<UpcomingSchedule>, ApiError> {
    let schedule = state.upcoming_service().schedule(params.refresh).await?;
    Ok(Json(schedule))
}

/// Force path: refreshes every eligible show regardless of staleness.
pub async fn force_refresh(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ForceRefreshResponse>, ApiError> {
    let outcome = state.upcoming_service().force_refresh().await?;

    Ok(Json(ForceRefreshResponse {
        success: true,
        refreshed: outcome.refreshed,
    }))
}
