use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState, StatsResponse};

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let store = state.store();
    let (books, movies, shows) =
        tokio::join!(store.book_stats(), store.movie_stats(), store.show_stats());

    Ok(Json(StatsResponse {
        books: books?,
        movies: movies?,
        shows: shows?,
    }))
}
