//! Upstream provider adapters.
//!
//! Each adapter speaks one external API and normalizes its payloads into the
//! crate's media models. Failures stay distinguishable through
//! [`ProviderError`] so callers can apply the right isolation policy:
//! the search aggregator swallows and logs, the refresh path skips the one
//! item, the recommendation path maps missing credentials to 503.

pub mod googlebooks;
pub mod openai;
pub mod openlibrary;
pub mod tmdb;

pub use googlebooks::GoogleBooksClient;
pub use openai::OpenAiClient;
pub use openlibrary::OpenLibraryClient;
pub use tmdb::TmdbClient;

use crate::models::{
    Book, Constraints, Movie, RecommendationCandidate, RecommendationContext, Show, ShowDetails,
};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("{0} is not configured")]
    MissingCredential(&'static str),
    #[error("{provider} has no record for {id}")]
    NotFound { provider: &'static str, id: String },
    #[error("{provider} response could not be decoded: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },
}

/// A searchable book catalog. Implementations form an ordered fallback
/// chain: the next source is tried when the previous one fails or comes
/// back empty.
#[async_trait]
pub trait BookSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search_books(&self, query: &str, limit: usize) -> Result<Vec<Book>, ProviderError>;
}

/// A searchable movie/show catalog that can also resolve per-show
/// scheduling details.
#[async_trait]
pub trait ScreenSource: Send + Sync {
    async fn search_movies(&self, query: &str, limit: usize) -> Result<Vec<Movie>, ProviderError>;

    async fn search_shows(&self, query: &str, limit: usize) -> Result<Vec<Show>, ProviderError>;

    async fn fetch_show_details(&self, id: i32) -> Result<ShowDetails, ProviderError>;
}

/// A recommendation backend grounded on the user's library context.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(
        &self,
        context: &RecommendationContext,
        query: &str,
        constraints: &Constraints,
    ) -> Result<Vec<RecommendationCandidate>, ProviderError>;
}
