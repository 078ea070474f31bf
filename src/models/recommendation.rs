use crate::domain::{MediaType, TropeAffinity};
use serde::{Deserialize, Serialize};

/// One library entry flattened for prompt construction. Status, rating, and
/// genres are carried verbatim from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    pub title: String,
    pub status: String,
    pub rating: Option<i32>,
    pub genres: Vec<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TropeTaste {
    pub trope: String,
    pub affinity: TropeAffinity,
}

/// Everything the context builder reads. Assembled from storage in one pass,
/// then handed to the pure builder.
#[derive(Debug, Clone, Default)]
pub struct RawUserData {
    pub books: Vec<LibraryItem>,
    pub movies: Vec<LibraryItem>,
    pub shows: Vec<LibraryItem>,
    pub dismissed_titles: Vec<String>,
    pub wishlist_titles: Vec<String>,
    pub tropes: Vec<TropeTaste>,
}

/// Request-scoped aggregate grounding a recommendation call. Built fresh per
/// request, never persisted.
///
/// `excluded_titles` is the case-sensitive union of dismissed and wishlist
/// titles; a candidate whose title appears here must be filtered out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationContext {
    pub books: Vec<LibraryItem>,
    pub movies: Vec<LibraryItem>,
    pub shows: Vec<LibraryItem>,
    pub excluded_titles: Vec<String>,
    pub loved_tropes: Vec<String>,
    pub liked_tropes: Vec<String>,
    pub disliked_tropes: Vec<String>,
    pub blacklisted_tropes: Vec<String>,
}

impl RecommendationContext {
    #[must_use]
    pub fn is_excluded(&self, title: &str) -> bool {
        self.excluded_titles.iter().any(|t| t == title)
    }
}

/// Caller-supplied bounds for a recommendation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub media_types: Vec<MediaType>,
    pub min_year: Option<i32>,
}

/// One suggestion parsed from the recommendation provider's response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationCandidate {
    pub title: String,
    pub media_type: MediaType,
    pub year: Option<i32>,
    pub reason: String,
}
