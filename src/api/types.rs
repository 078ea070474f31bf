use serde::{Deserialize, Serialize};

use crate::domain::MediaType;
use crate::models::{Book, Movie, RecommendationCandidate, SearchResult, Show};

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub query: String,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ForceRefreshResponse {
    pub success: bool,
    pub refreshed: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub query: String,
    #[serde(default)]
    pub media_types: Vec<MediaType>,
    pub min_year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct AddBookRequest {
    pub book: Book,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMovieRequest {
    pub movie: Movie,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AddShowRequest {
    pub show: Show,
    pub status: String,
}

/// `added: false` means the entry already existed and was left untouched.
#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub success: bool,
    pub added: bool,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: Self = Self { success: true };
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub status: Option<String>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    #[serde(rename = "currentSeason")]
    pub current_season: Option<i32>,
    #[serde(rename = "currentEpisode")]
    pub current_episode: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDismissedRequest {
    pub title: String,
    pub media_type: MediaType,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWishlistRequest {
    pub title: String,
    pub media_type: MediaType,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetTropeRequest {
    pub trope: String,
    pub affinity: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceTropesRequest {
    pub tropes: Vec<SetTropeRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReviewRequest {
    pub media_type: MediaType,
    pub media_id: String,
    pub title: String,
    pub rating: i32,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetGoalRequest {
    pub year: i32,
    pub media_type: MediaType,
    pub target: i32,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub books: crate::db::MediaStats,
    pub movies: crate::db::MediaStats,
    pub shows: crate::db::MediaStats,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "uptimeSeconds")]
    pub uptime_seconds: u64,
}
