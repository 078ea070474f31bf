use serde::{Deserialize, Serialize};

/// Provider-sourced book metadata. `id` is the OpenLibrary work key
/// (e.g. `OL45883W`); Google Books fallback results are keyed by volume id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub cover_url: Option<String>,
    pub first_publish_year: Option<i32>,
    pub provider_rating: Option<f64>,
}

/// Provider-sourced movie metadata keyed by TMDB id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub original_title: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<String>,
    pub provider_rating: Option<f64>,
}

/// Provider-sourced show metadata keyed by TMDB id.
///
/// `provider_status` is TMDB's lifecycle string (`Returning Series`, `Ended`,
/// `Canceled`, ...). It gates upcoming-episode refreshes: ended shows are
/// never re-fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: i32,
    pub title: String,
    pub original_title: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub cover_url: Option<String>,
    pub first_air_date: Option<String>,
    pub provider_rating: Option<f64>,
    pub provider_status: Option<String>,
}

/// One search hit. The `mediaType` tag lets mixed result lists stay
/// self-describing on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mediaType", rename_all = "lowercase")]
pub enum SearchResult {
    Book(Book),
    Movie(Movie),
    Show(Show),
}

impl SearchResult {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Book(b) => &b.title,
            Self::Movie(m) => &m.title,
            Self::Show(s) => &s.title,
        }
    }
}

/// Next scheduled episode for a show, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextEpisode {
    pub air_date: String,
    pub season: i32,
    pub episode: i32,
    pub name: Option<String>,
}

/// Detail fetch result used by the upcoming-episode refresh.
#[derive(Debug, Clone)]
pub struct ShowDetails {
    pub status: Option<String>,
    pub next_episode: Option<NextEpisode>,
}

/// A tracked show's scheduled episode, shaped for the `/upcoming` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRelease {
    pub show_id: i32,
    pub title: String,
    pub cover_url: Option<String>,
    pub air_date: String,
    pub season: i32,
    pub episode: i32,
    pub episode_name: Option<String>,
}
