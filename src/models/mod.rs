pub mod media;
pub mod recommendation;

pub use media::{Book, Movie, NextEpisode, SearchResult, Show, ShowDetails, UpcomingRelease};
pub use recommendation::{
    Constraints, LibraryItem, RawUserData, RecommendationCandidate, RecommendationContext,
    TropeTaste,
};
