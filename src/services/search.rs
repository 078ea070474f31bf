use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::{BookSource, ScreenSource};
use crate::domain::MediaType;
use crate::models::{Book, Movie, SearchResult, Show};

const BOOK_RESULT_LIMIT: usize = 15;
const SCREEN_RESULT_LIMIT: usize = 10;

pub struct SearchService {
    book_sources: Vec<Arc<dyn BookSource>>,
    screen: Arc<dyn ScreenSource>,
}

impl SearchService {
    #[must_use]
    pub const fn new(
        book_sources: Vec<Arc<dyn BookSource>>,
        screen: Arc<dyn ScreenSource>,
    ) -> Self {
        Self {
            book_sources,
            screen,
        }
    }

    /// Fans out to every provider matching the type filter concurrently and
    /// merges the blocks in book/movie/show order. A failing provider
    /// contributes an empty block, never an error.
    pub async fn search(&self, query: &str, media_type: Option<MediaType>) -> Vec<SearchResult> {
        info!("Searching for '{}'", query);

        let wants = |t: MediaType| media_type.is_none_or(|filter| filter == t);

        let (books, movies, shows) = tokio::join!(
            self.book_block(query, wants(MediaType::Book)),
            self.movie_block(query, wants(MediaType::Movie)),
            self.show_block(query, wants(MediaType::Show)),
        );

        books
            .into_iter()
            .map(SearchResult::Book)
            .chain(movies.into_iter().map(SearchResult::Movie))
            .chain(shows.into_iter().map(SearchResult::Show))
            .collect()
    }

    /// Book sources are an ordered fallback chain. The next source is tried
    /// when the previous one fails or comes back empty.
    async fn book_block(&self, query: &str, wanted: bool) -> Vec<Book> {
        if !wanted {
            return Vec::new();
        }

        for source in &self.book_sources {
            match source.search_books(query, BOOK_RESULT_LIMIT).await {
                Ok(books) if !books.is_empty() => return books,
                Ok(_) => debug!("No book results from {}, trying next source", source.name()),
                Err(e) => warn!("Book search via {} failed: {}", source.name(), e),
            }
        }

        Vec::new()
    }

    async fn movie_block(&self, query: &str, wanted: bool) -> Vec<Movie> {
        if !wanted {
            return Vec::new();
        }

        match self.screen.search_movies(query, SCREEN_RESULT_LIMIT).await {
            Ok(movies) => movies,
            Err(e) => {
                warn!("Movie search failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn show_block(&self, query: &str, wanted: bool) -> Vec<Show> {
        if !wanted {
            return Vec::new();
        }

        match self.screen.search_shows(query, SCREEN_RESULT_LIMIT).await {
            Ok(shows) => shows,
            Err(e) => {
                warn!("Show search failed: {}", e);
                Vec::new()
            }
        }
    }
}
