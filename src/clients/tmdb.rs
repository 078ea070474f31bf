use crate::clients::{ProviderError, ScreenSource};
use crate::models::{Movie, NextEpisode, Show, ShowDetails};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

const TMDB_API: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w342";

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct MovieResult {
    id: i32,
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
    genre_ids: Option<Vec<i32>>,
    poster_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ShowResult {
    id: i32,
    name: Option<String>,
    original_name: Option<String>,
    overview: Option<String>,
    genre_ids: Option<Vec<i32>>,
    poster_path: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ShowDetailsResponse {
    status: Option<String>,
    next_episode_to_air: Option<EpisodeToAir>,
}

#[derive(Debug, Deserialize)]
struct EpisodeToAir {
    air_date: Option<String>,
    season_number: Option<i32>,
    episode_number: Option<i32>,
    name: Option<String>,
}

/// Search responses only carry genre ids; the id table is static per TMDB docs.
fn genre_name(id: i32) -> Option<&'static str> {
    let name = match id {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Science Fiction",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        10759 => "Action & Adventure",
        10762 => "Kids",
        10763 => "News",
        10764 => "Reality",
        10765 => "Sci-Fi & Fantasy",
        10766 => "Soap",
        10767 => "Talk",
        10768 => "War & Politics",
        _ => return None,
    };
    Some(name)
}

fn map_genres(ids: Option<Vec<i32>>) -> Vec<String> {
    ids.unwrap_or_default()
        .into_iter()
        .filter_map(|id| genre_name(id).map(str::to_string))
        .collect()
}

fn poster_url(path: Option<String>) -> Option<String> {
    path.map(|p| format!("{TMDB_IMAGE_BASE}{p}"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
}

impl TmdbClient {
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    #[must_use]
    pub const fn with_shared_client(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    fn key(&self) -> Result<&str, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredential("TMDB_API_KEY"));
        }
        Ok(&self.api_key)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
    ) -> Result<T, ProviderError> {
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: "tmdb",
                status,
                body,
            });
        }

        Ok(response.json().await?)
    }

    fn map_movie(result: MovieResult) -> Option<Movie> {
        let title = result.title?;
        Some(Movie {
            id: result.id,
            title,
            original_title: result.original_title,
            description: non_empty(result.overview),
            genres: map_genres(result.genre_ids),
            cover_url: poster_url(result.poster_path),
            release_date: non_empty(result.release_date),
            provider_rating: result.vote_average,
        })
    }

    fn map_show(result: ShowResult) -> Option<Show> {
        let title = result.name?;
        Some(Show {
            id: result.id,
            title,
            original_title: result.original_name,
            description: non_empty(result.overview),
            genres: map_genres(result.genre_ids),
            cover_url: poster_url(result.poster_path),
            first_air_date: non_empty(result.first_air_date),
            provider_rating: result.vote_average,
            provider_status: None,
        })
    }

    /// Episodes announced without a date yet are not upcoming in any useful sense.
    fn map_next_episode(episode: EpisodeToAir) -> Option<NextEpisode> {
        let air_date = episode.air_date.filter(|d| !d.is_empty())?;
        Some(NextEpisode {
            air_date,
            season: episode.season_number.unwrap_or(0),
            episode: episode.episode_number.unwrap_or(0),
            name: episode.name.filter(|n| !n.is_empty()),
        })
    }
}

#[async_trait]
impl ScreenSource for TmdbClient {
    async fn search_movies(&self, query: &str, limit: usize) -> Result<Vec<Movie>, ProviderError> {
        let key = self.key()?;
        let url = format!(
            "{}/search/movie?api_key={}&query={}",
            TMDB_API,
            key,
            urlencoding::encode(query)
        );
        let response: SearchResponse<MovieResult> = self.get_json(url).await?;

        Ok(response
            .results
            .into_iter()
            .filter_map(Self::map_movie)
            .take(limit)
            .collect())
    }

    async fn search_shows(&self, query: &str, limit: usize) -> Result<Vec<Show>, ProviderError> {
        let key = self.key()?;
        let url = format!(
            "{}/search/tv?api_key={}&query={}",
            TMDB_API,
            key,
            urlencoding::encode(query)
        );
        let response: SearchResponse<ShowResult> = self.get_json(url).await?;

        Ok(response
            .results
            .into_iter()
            .filter_map(Self::map_show)
            .take(limit)
            .collect())
    }

    async fn fetch_show_details(&self, id: i32) -> Result<ShowDetails, ProviderError> {
        let key = self.key()?;
        let url = format!("{TMDB_API}/tv/{id}?api_key={key}");
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound {
                provider: "tmdb",
                id: id.to_string(),
            });
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: "tmdb",
                status,
                body,
            });
        }

        let details: ShowDetailsResponse = response.json().await?;

        Ok(ShowDetails {
            status: details.status,
            next_episode: details
                .next_episode_to_air
                .and_then(Self::map_next_episode),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_genre_ids_resolve_and_unknown_are_dropped() {
        let genres = map_genres(Some(vec![878, 18, 424242]));
        assert_eq!(genres, vec!["Science Fiction", "Drama"]);
    }

    #[test]
    fn poster_paths_expand_to_full_urls() {
        assert_eq!(
            poster_url(Some("/abc.jpg".to_string())).as_deref(),
            Some("https://image.tmdb.org/t/p/w342/abc.jpg")
        );
        assert_eq!(poster_url(None), None);
    }

    #[test]
    fn next_episode_without_air_date_is_dropped() {
        let undated = EpisodeToAir {
            air_date: Some(String::new()),
            season_number: Some(2),
            episode_number: Some(5),
            name: None,
        };
        assert_eq!(TmdbClient::map_next_episode(undated), None);

        let dated = EpisodeToAir {
            air_date: Some("2026-09-14".to_string()),
            season_number: Some(2),
            episode_number: Some(5),
            name: Some("The Reckoning".to_string()),
        };
        let episode = TmdbClient::map_next_episode(dated).unwrap();
        assert_eq!(episode.air_date, "2026-09-14");
        assert_eq!(episode.season, 2);
        assert_eq!(episode.episode, 5);
        assert_eq!(episode.name.as_deref(), Some("The Reckoning"));
    }

    #[test]
    fn missing_key_is_reported_before_any_request() {
        let client = TmdbClient::new(String::new());
        assert!(matches!(
            client.key(),
            Err(ProviderError::MissingCredential("TMDB_API_KEY"))
        ));
    }
}
