use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use trackarr::clients::{BookSource, ProviderError, Recommender, ScreenSource};
use trackarr::config::Config;
use trackarr::db::Store;
use trackarr::domain::MediaType;
use trackarr::models::{
    Book, Constraints, Movie, RecommendationCandidate, RecommendationContext, SearchResult, Show,
    ShowDetails,
};
use trackarr::services::SearchService;
use trackarr::state::SharedState;

fn book(title: &str) -> Book {
    Book {
        id: format!("OL-{title}"),
        title: title.to_string(),
        authors: vec!["Author".to_string()],
        description: None,
        genres: Vec::new(),
        cover_url: None,
        first_publish_year: Some(2001),
        provider_rating: None,
    }
}

fn movie(id: i32, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        original_title: None,
        description: None,
        genres: Vec::new(),
        cover_url: None,
        release_date: Some("2014-11-07".to_string()),
        provider_rating: None,
    }
}

fn show(id: i32, title: &str) -> Show {
    Show {
        id,
        title: title.to_string(),
        original_title: None,
        description: None,
        genres: Vec::new(),
        cover_url: None,
        first_air_date: Some("2022-02-18".to_string()),
        provider_rating: None,
        provider_status: Some("Returning Series".to_string()),
    }
}

enum BookScript {
    Hits(Vec<Book>),
    Empty,
    Fail,
}

struct ScriptedBooks {
    label: &'static str,
    script: BookScript,
    calls: AtomicUsize,
}

impl ScriptedBooks {
    fn new(label: &'static str, script: BookScript) -> Arc<Self> {
        Arc::new(Self {
            label,
            script,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl BookSource for ScriptedBooks {
    fn name(&self) -> &'static str {
        self.label
    }

    async fn search_books(&self, _query: &str, limit: usize) -> Result<Vec<Book>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            BookScript::Hits(books) => Ok(books.iter().take(limit).cloned().collect()),
            BookScript::Empty => Ok(Vec::new()),
            BookScript::Fail => Err(ProviderError::Status {
                provider: self.label,
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
            }),
        }
    }
}

struct ScriptedScreen {
    movies: Vec<Movie>,
    shows: Vec<Show>,
    fail: bool,
    calls: AtomicUsize,
}

impl ScriptedScreen {
    fn new(movies: Vec<Movie>, shows: Vec<Show>) -> Arc<Self> {
        Arc::new(Self {
            movies,
            shows,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            movies: Vec::new(),
            shows: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ScreenSource for ScriptedScreen {
    async fn search_movies(&self, _query: &str, limit: usize) -> Result<Vec<Movie>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::MissingCredential("TMDB_API_KEY"));
        }
        Ok(self.movies.iter().take(limit).cloned().collect())
    }

    async fn search_shows(&self, _query: &str, limit: usize) -> Result<Vec<Show>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::MissingCredential("TMDB_API_KEY"));
        }
        Ok(self.shows.iter().take(limit).cloned().collect())
    }

    async fn fetch_show_details(&self, _id: i32) -> Result<ShowDetails, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ShowDetails {
            status: None,
            next_episode: None,
        })
    }
}

struct NoRecommender;

#[async_trait]
impl Recommender for NoRecommender {
    async fn recommend(
        &self,
        _context: &RecommendationContext,
        _query: &str,
        _constraints: &Constraints,
    ) -> Result<Vec<RecommendationCandidate>, ProviderError> {
        Err(ProviderError::MissingCredential("OPENAI_API_KEY"))
    }
}

#[tokio::test]
async fn test_book_chain_falls_back_on_empty_and_failure() {
    let empty = ScriptedBooks::new("primary", BookScript::Empty);
    let hits = ScriptedBooks::new("fallback", BookScript::Hits(vec![book("Piranesi")]));
    let screen = ScriptedScreen::new(Vec::new(), Vec::new());

    let service = SearchService::new(
        vec![empty.clone() as Arc<dyn BookSource>, hits.clone()],
        screen,
    );
    let results = service.search("piranesi", Some(MediaType::Book)).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title(), "Piranesi");
    assert_eq!(empty.calls.load(Ordering::SeqCst), 1);
    assert_eq!(hits.calls.load(Ordering::SeqCst), 1);

    let failing = ScriptedBooks::new("primary", BookScript::Fail);
    let hits = ScriptedBooks::new("fallback", BookScript::Hits(vec![book("Piranesi")]));
    let screen = ScriptedScreen::new(Vec::new(), Vec::new());

    let service = SearchService::new(
        vec![failing.clone() as Arc<dyn BookSource>, hits],
        screen,
    );
    let results = service.search("piranesi", Some(MediaType::Book)).await;

    assert_eq!(results.len(), 1);
    assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_first_book_source_with_results_wins() {
    let primary = ScriptedBooks::new("primary", BookScript::Hits(vec![book("Dune")]));
    let fallback = ScriptedBooks::new("fallback", BookScript::Hits(vec![book("Other Dune")]));
    let screen = ScriptedScreen::new(Vec::new(), Vec::new());

    let service = SearchService::new(
        vec![primary as Arc<dyn BookSource>, fallback.clone()],
        screen,
    );
    let results = service.search("dune", Some(MediaType::Book)).await;

    assert_eq!(results[0].title(), "Dune");
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_screen_failure_leaves_book_results_intact() {
    let books = ScriptedBooks::new("books", BookScript::Hits(vec![book("Dune")]));
    let screen = ScriptedScreen::failing();

    let service = SearchService::new(vec![books as Arc<dyn BookSource>], screen);
    let results = service.search("dune", None).await;

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], SearchResult::Book(_)));
}

#[tokio::test]
async fn test_merged_results_group_books_then_movies_then_shows() {
    let books = ScriptedBooks::new("books", BookScript::Hits(vec![book("Annihilation")]));
    let screen = ScriptedScreen::new(
        vec![movie(1, "Annihilation"), movie(2, "Arrival")],
        vec![show(3, "Annihilation: The Series")],
    );

    let service = SearchService::new(vec![books as Arc<dyn BookSource>], screen);
    let results = service.search("annihilation", None).await;

    let kinds: Vec<&str> = results
        .iter()
        .map(|r| match r {
            SearchResult::Book(_) => "book",
            SearchResult::Movie(_) => "movie",
            SearchResult::Show(_) => "show",
        })
        .collect();
    assert_eq!(kinds, vec!["book", "movie", "movie", "show"]);
}

#[tokio::test]
async fn test_type_filter_skips_other_providers() {
    let books = ScriptedBooks::new("books", BookScript::Hits(vec![book("Dune")]));
    let screen = ScriptedScreen::new(vec![movie(1, "Dune")], vec![show(2, "Dune: Prophecy")]);

    let service = SearchService::new(
        vec![books.clone() as Arc<dyn BookSource>],
        screen.clone(),
    );
    service.search("dune", Some(MediaType::Movie)).await;

    assert_eq!(books.calls.load(Ordering::SeqCst), 0);
    // Only search_movies, not search_shows.
    assert_eq!(screen.calls.load(Ordering::SeqCst), 1);
}

async fn spawn_app_with_providers(
    book_sources: Vec<Arc<dyn BookSource>>,
    screen: Arc<dyn ScreenSource>,
) -> axum::Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let store = Store::new("sqlite::memory:").await.expect("store");
    let shared = SharedState::assemble(config, store, book_sources, screen, Arc::new(NoRecommender));
    let state = trackarr::api::create_app_state(Arc::new(shared), None);
    trackarr::api::router(state)
}

#[tokio::test]
async fn test_short_query_is_rejected_before_provider_fanout() {
    let books = ScriptedBooks::new("books", BookScript::Hits(vec![book("Dune")]));
    let screen = ScriptedScreen::new(vec![movie(1, "Dune")], Vec::new());

    let app =
        spawn_app_with_providers(vec![books.clone() as Arc<dyn BookSource>], screen.clone()).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/search?q=d")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/search?q=dune&type=podcast")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(books.calls.load(Ordering::SeqCst), 0);
    assert_eq!(screen.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_endpoint_echoes_query_and_type() {
    let books = ScriptedBooks::new("books", BookScript::Hits(vec![book("Dune")]));
    let screen = ScriptedScreen::new(Vec::new(), Vec::new());

    let app = spawn_app_with_providers(vec![books as Arc<dyn BookSource>], screen).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/search?q=dune&type=book")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["query"], "dune");
    assert_eq!(body["type"], "book");
    assert_eq!(body["results"][0]["mediaType"], "book");
    assert_eq!(body["results"][0]["title"], "Dune");
}
