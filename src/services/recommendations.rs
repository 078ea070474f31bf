use std::sync::Arc;

use rand::seq::IndexedRandom;
use thiserror::Error;
use tracing::{debug, warn};

use crate::clients::{ProviderError, Recommender};
use crate::db::{LibraryBook, LibraryMovie, LibraryShow, Store};
use crate::domain::{MediaType, TropeAffinity};
use crate::models::{
    Constraints, LibraryItem, RawUserData, RecommendationCandidate, RecommendationContext,
    TropeTaste,
};

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("{0} is not configured")]
    CredentialMissing(&'static str),

    #[error("Recommendation provider error: {0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ProviderError> for RecommendError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingCredential(name) => Self::CredentialMissing(name),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for RecommendError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

pub struct RecommendationService {
    store: Store,
    recommender: Arc<dyn Recommender>,
    max_context_items: usize,
}

impl RecommendationService {
    #[must_use]
    pub const fn new(store: Store, recommender: Arc<dyn Recommender>, max_context_items: usize) -> Self {
        Self {
            store,
            recommender,
            max_context_items,
        }
    }

    /// Free-form recommendation request grounded on the library context.
    /// Candidates whose title sits in the exclusion set are filtered out
    /// even if the provider ignores its instructions.
    pub async fn ask(
        &self,
        query: &str,
        constraints: &Constraints,
    ) -> Result<Vec<RecommendationCandidate>, RecommendError> {
        let raw = self.gather().await?;
        let context = build_context(raw, self.max_context_items);

        let candidates = self.recommender.recommend(&context, query, constraints).await?;

        Ok(Self::drop_excluded(candidates, &context))
    }

    /// One spontaneous pick per media type. A failing call for one type is
    /// logged and skipped; a missing credential fails the whole request
    /// since no type could ever succeed.
    pub async fn surprise(&self) -> Result<Vec<RecommendationCandidate>, RecommendError> {
        let raw = self.gather().await?;
        let context = build_context(raw, self.max_context_items);

        let mut picks = Vec::new();
        for media_type in MediaType::ALL {
            let constraints = Constraints {
                media_types: vec![media_type],
                min_year: None,
            };
            let query = surprise_query(media_type, &context);

            match self.recommender.recommend(&context, &query, &constraints).await {
                Ok(candidates) => {
                    let pick = candidates
                        .into_iter()
                        .find(|c| c.media_type == media_type && !context.is_excluded(&c.title));
                    if let Some(pick) = pick {
                        picks.push(pick);
                    }
                }
                Err(ProviderError::MissingCredential(name)) => {
                    return Err(RecommendError::CredentialMissing(name));
                }
                Err(e) => warn!("Surprise pick for {} failed: {}", media_type, e),
            }
        }

        Ok(picks)
    }

    fn drop_excluded(
        candidates: Vec<RecommendationCandidate>,
        context: &RecommendationContext,
    ) -> Vec<RecommendationCandidate> {
        candidates
            .into_iter()
            .filter(|c| {
                let keep = !context.is_excluded(&c.title);
                if !keep {
                    debug!("Dropping excluded recommendation '{}'", c.title);
                }
                keep
            })
            .collect()
    }

    async fn gather(&self) -> anyhow::Result<RawUserData> {
        let (books, movies, shows, dismissed_titles, wishlist_titles, tropes) = tokio::join!(
            self.store.list_books(),
            self.store.list_movies(),
            self.store.list_shows(),
            self.store.dismissed_titles(),
            self.store.wishlist_titles(),
            self.store.list_tropes(),
        );

        Ok(RawUserData {
            books: books?.into_iter().map(book_item).collect(),
            movies: movies?.into_iter().map(movie_item).collect(),
            shows: shows?.into_iter().map(show_item).collect(),
            dismissed_titles: dismissed_titles?,
            wishlist_titles: wishlist_titles?,
            tropes: tropes?
                .into_iter()
                .map(|row| TropeTaste {
                    trope: row.trope,
                    affinity: row.affinity.parse().unwrap_or(TropeAffinity::Neutral),
                })
                .collect(),
        })
    }
}

fn book_item(row: LibraryBook) -> LibraryItem {
    LibraryItem {
        title: row.title,
        status: row.status,
        rating: row.rating,
        genres: row.genres,
        updated_at: row.updated_at,
    }
}

fn movie_item(row: LibraryMovie) -> LibraryItem {
    LibraryItem {
        title: row.title,
        status: row.status,
        rating: row.rating,
        genres: row.genres,
        updated_at: row.updated_at,
    }
}

fn show_item(row: LibraryShow) -> LibraryItem {
    LibraryItem {
        title: row.title,
        status: row.status,
        rating: row.rating,
        genres: row.genres,
        updated_at: row.updated_at,
    }
}

fn surprise_query(media_type: MediaType, context: &RecommendationContext) -> String {
    let mut rng = rand::rng();
    let spotlight = context
        .loved_tropes
        .choose(&mut rng)
        .or_else(|| context.liked_tropes.choose(&mut rng));

    spotlight.map_or_else(
        || format!("Surprise me with one standout {media_type} I likely have not heard of."),
        |trope| {
            format!(
                "Surprise me with one standout {media_type} leaning into {trope} that I likely have not heard of."
            )
        },
    )
}

/// Pure assembly of the request-scoped recommendation context.
///
/// Exclusions are the union of dismissed and wishlist titles, deduplicated
/// by exact string in first-seen order. Item fields pass through verbatim;
/// each type's list is capped to the most recently updated entries.
#[must_use]
pub fn build_context(raw: RawUserData, max_items_per_type: usize) -> RecommendationContext {
    let mut excluded_titles: Vec<String> = Vec::new();
    for title in raw.dismissed_titles.into_iter().chain(raw.wishlist_titles) {
        if !excluded_titles.contains(&title) {
            excluded_titles.push(title);
        }
    }

    let mut loved_tropes = Vec::new();
    let mut liked_tropes = Vec::new();
    let mut disliked_tropes = Vec::new();
    let mut blacklisted_tropes = Vec::new();
    for taste in raw.tropes {
        match taste.affinity {
            TropeAffinity::Love => loved_tropes.push(taste.trope),
            TropeAffinity::Like => liked_tropes.push(taste.trope),
            TropeAffinity::Neutral => {}
            TropeAffinity::Dislike => disliked_tropes.push(taste.trope),
            TropeAffinity::Blacklist => blacklisted_tropes.push(taste.trope),
        }
    }

    RecommendationContext {
        books: cap_recent(raw.books, max_items_per_type),
        movies: cap_recent(raw.movies, max_items_per_type),
        shows: cap_recent(raw.shows, max_items_per_type),
        excluded_titles,
        loved_tropes,
        liked_tropes,
        disliked_tropes,
        blacklisted_tropes,
    }
}

fn cap_recent(mut items: Vec<LibraryItem>, max: usize) -> Vec<LibraryItem> {
    items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    items.truncate(max);
    items
}
