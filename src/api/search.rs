use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::MediaType;

use super::validation::validate_search_query;
use super::{ApiError, AppState, SearchResponse};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

/// Validation happens before any provider is contacted: a short query must
/// not cost an upstream call.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = validate_search_query(params.q.as_deref().unwrap_or_default())?;

    let media_type = params
        .media_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<MediaType>()
                .map_err(|e| ApiError::validation(e.to_string()))
        })
        .transpose()?;

    let results = state.search_service().search(query, media_type).await;

    Ok(Json(SearchResponse {
        results,
        query: query.to_string(),
        media_type: media_type.map(|t| t.to_string()),
    }))
}
