use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tracing::info;

use crate::db::{LibraryBook, LibraryMovie, LibraryShow};
use crate::domain::{BookStatus, MovieStatus, ShowStatus};

use super::validation::validate_rating;
use super::{
    AddBookRequest, AddMovieRequest, AddResponse, AddShowRequest, ApiError, AppState,
    SuccessResponse, UpdateEntryRequest,
};

fn parse_status<T: std::str::FromStr>(status: &str) -> Result<T, ApiError>
where
    T::Err: std::fmt::Display,
{
    status
        .parse::<T>()
        .map_err(|e| ApiError::validation(e.to_string()))
}

fn checked_rating(rating: Option<i32>) -> Result<Option<i32>, ApiError> {
    rating.map(validate_rating).transpose()
}

// ---------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------

pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LibraryBook>>, ApiError> {
    Ok(Json(state.store().list_books().await?))
}

pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddBookRequest>,
) -> Result<Json<AddResponse>, ApiError> {
    let status: BookStatus = parse_status(&request.status)?;
    let added = state.store().add_book(&request.book, status).await?;

    if added {
        info!("Added book '{}' to library", request.book.title);
    }

    Ok(Json(AddResponse {
        success: true,
        added,
    }))
}

pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateEntryRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let status = request
        .status
        .as_deref()
        .map(parse_status::<BookStatus>)
        .transpose()?;
    let rating = checked_rating(request.rating)?;

    let updated = state
        .store()
        .update_book_entry(&id, status, rating, request.notes.as_deref())
        .await?;

    if !updated {
        return Err(ApiError::not_found("Book", id));
    }
    Ok(Json(SuccessResponse::OK))
}

pub async fn remove_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if !state.store().remove_book(&id).await? {
        return Err(ApiError::not_found("Book", id));
    }
    Ok(Json(SuccessResponse::OK))
}

// ---------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LibraryMovie>>, ApiError> {
    Ok(Json(state.store().list_movies().await?))
}

pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddMovieRequest>,
) -> Result<Json<AddResponse>, ApiError> {
    let status: MovieStatus = parse_status(&request.status)?;
    let added = state.store().add_movie(&request.movie, status).await?;

    if added {
        info!("Added movie '{}' to library", request.movie.title);
    }

    Ok(Json(AddResponse {
        success: true,
        added,
    }))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateEntryRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let status = request
        .status
        .as_deref()
        .map(parse_status::<MovieStatus>)
        .transpose()?;
    let rating = checked_rating(request.rating)?;

    let updated = state
        .store()
        .update_movie_entry(id, status, rating, request.notes.as_deref())
        .await?;

    if !updated {
        return Err(ApiError::not_found("Movie", id));
    }
    Ok(Json(SuccessResponse::OK))
}

pub async fn remove_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if !state.store().remove_movie(id).await? {
        return Err(ApiError::not_found("Movie", id));
    }
    Ok(Json(SuccessResponse::OK))
}

// ---------------------------------------------------------------------
// Shows
// ---------------------------------------------------------------------

pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LibraryShow>>, ApiError> {
    Ok(Json(state.store().list_shows().await?))
}

pub async fn add_show(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddShowRequest>,
) -> Result<Json<AddResponse>, ApiError> {
    let status: ShowStatus = parse_status(&request.status)?;
    let added = state.store().add_show(&request.show, status).await?;

    if added {
        info!("Added show '{}' to library", request.show.title);
    }

    Ok(Json(AddResponse {
        success: true,
        added,
    }))
}

pub async fn update_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateEntryRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let status = request
        .status
        .as_deref()
        .map(parse_status::<ShowStatus>)
        .transpose()?;
    let rating = checked_rating(request.rating)?;

    let updated = state
        .store()
        .update_show_entry(
            id,
            status,
            rating,
            request.notes.as_deref(),
            request.current_season,
            request.current_episode,
        )
        .await?;

    if !updated {
        return Err(ApiError::not_found("Show", id));
    }
    Ok(Json(SuccessResponse::OK))
}

pub async fn remove_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if !state.store().remove_show(id).await? {
        return Err(ApiError::not_found("Show", id));
    }
    Ok(Json(SuccessResponse::OK))
}
