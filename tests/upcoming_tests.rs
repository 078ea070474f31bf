use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use trackarr::clients::{BookSource, ProviderError, Recommender, ScreenSource};
use trackarr::config::Config;
use trackarr::db::Store;
use trackarr::domain::ShowStatus;
use trackarr::models::{
    Book, Constraints, Movie, NextEpisode, RecommendationCandidate, RecommendationContext, Show,
    ShowDetails,
};
use trackarr::services::{RefreshOutcome, UpcomingService};
use trackarr::state::SharedState;

fn show(id: i32, title: &str) -> Show {
    Show {
        id,
        title: title.to_string(),
        original_title: None,
        description: None,
        genres: Vec::new(),
        cover_url: None,
        first_air_date: Some("2020-01-01".to_string()),
        provider_rating: None,
        provider_status: Some("Returning Series".to_string()),
    }
}

fn ended_show(id: i32, title: &str) -> Show {
    Show {
        provider_status: Some("Ended".to_string()),
        ..show(id, title)
    }
}

fn episode(air_date: &str) -> NextEpisode {
    NextEpisode {
        air_date: air_date.to_string(),
        season: 2,
        episode: 1,
        name: Some("Premiere".to_string()),
    }
}

/// Scripted detail provider that records call ordering and concurrency.
struct TrackingScreen {
    episodes: HashMap<i32, NextEpisode>,
    fail_ids: Vec<i32>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    starts: Mutex<HashMap<i32, Instant>>,
    ends: Mutex<HashMap<i32, Instant>>,
    detail_calls: AtomicUsize,
}

impl TrackingScreen {
    fn new(episodes: HashMap<i32, NextEpisode>) -> Arc<Self> {
        Self::with_failures(episodes, Vec::new())
    }

    fn with_failures(episodes: HashMap<i32, NextEpisode>, fail_ids: Vec<i32>) -> Arc<Self> {
        Arc::new(Self {
            episodes,
            fail_ids,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            starts: Mutex::new(HashMap::new()),
            ends: Mutex::new(HashMap::new()),
            detail_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ScreenSource for TrackingScreen {
    async fn search_movies(&self, _query: &str, _limit: usize) -> Result<Vec<Movie>, ProviderError> {
        Ok(Vec::new())
    }

    async fn search_shows(&self, _query: &str, _limit: usize) -> Result<Vec<Show>, ProviderError> {
        Ok(Vec::new())
    }

    async fn fetch_show_details(&self, id: i32) -> Result<ShowDetails, ProviderError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.starts.lock().unwrap().insert(id, Instant::now());

        tokio::time::sleep(std::time::Duration::from_millis(25)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.ends.lock().unwrap().insert(id, Instant::now());

        if self.fail_ids.contains(&id) {
            return Err(ProviderError::Status {
                provider: "tmdb",
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "upstream broke".to_string(),
            });
        }

        Ok(ShowDetails {
            status: Some("Returning Series".to_string()),
            next_episode: self.episodes.get(&id).cloned(),
        })
    }
}

async fn memory_store() -> Store {
    Store::new("sqlite::memory:").await.expect("store")
}

fn service(store: &Store, screen: Arc<TrackingScreen>) -> UpcomingService {
    UpcomingService::new(store.clone(), screen, 24, 5)
}

#[tokio::test]
async fn test_new_shows_are_stale_until_refreshed() {
    let store = memory_store().await;
    store.add_show(&show(1, "A"), ShowStatus::Watching).await.unwrap();
    store.add_show(&show(2, "B"), ShowStatus::ToWatch).await.unwrap();

    let screen = TrackingScreen::new(HashMap::from([(1, episode("2099-09-14"))]));
    let svc = service(&store, screen);

    assert_eq!(svc.identify_stale().await.unwrap(), vec![1, 2]);

    let outcome = svc.refresh_stale().await.unwrap();
    assert_eq!(
        outcome,
        RefreshOutcome {
            refreshed: 2,
            failed: 0
        }
    );

    assert!(svc.identify_stale().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stamped_shows_age_back_into_staleness() {
    let store = memory_store().await;
    store.add_show(&show(1, "A"), ShowStatus::Watching).await.unwrap();
    store.add_show(&show(2, "B"), ShowStatus::Watching).await.unwrap();

    let screen = TrackingScreen::new(HashMap::new());
    service(&store, screen.clone()).refresh_stale().await.unwrap();

    store.add_show(&show(3, "C"), ShowStatus::Watching).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    // Under the 24h threshold only the never-fetched show is due.
    let day_window = service(&store, screen.clone());
    assert_eq!(day_window.identify_stale().await.unwrap(), vec![3]);

    // A zero-hour threshold ages the stamped shows out as well.
    let zero_window = UpcomingService::new(store.clone(), screen, 0, 5);
    assert_eq!(zero_window.identify_stale().await.unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_terminal_and_inactive_shows_are_never_refreshed() {
    let store = memory_store().await;
    store
        .add_show(&ended_show(1, "Finished"), ShowStatus::Watching)
        .await
        .unwrap();
    store.add_show(&show(2, "Dropped"), ShowStatus::Watching).await.unwrap();
    store
        .update_show_entry(2, Some(ShowStatus::Abandoned), None, None, None, None)
        .await
        .unwrap();
    store.add_show(&show(3, "Active"), ShowStatus::Watching).await.unwrap();

    let screen = TrackingScreen::new(HashMap::new());
    let svc = service(&store, screen.clone());

    assert_eq!(svc.identify_stale().await.unwrap(), vec![3]);

    let outcome = svc.force_refresh().await.unwrap();
    assert_eq!(outcome.refreshed, 1);
    assert_eq!(screen.detail_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_no_next_episode_still_stamps_and_clears_schedule() {
    let store = memory_store().await;
    store.add_show(&show(7, "Waiting"), ShowStatus::Watching).await.unwrap();

    let with_episode = TrackingScreen::new(HashMap::from([(7, episode("2099-05-05"))]));
    let svc = service(&store, with_episode);
    svc.force_refresh().await.unwrap();
    assert_eq!(svc.schedule(false).await.unwrap().total, 1);

    // Season over: the provider now reports no scheduled episode.
    let without_episode = TrackingScreen::new(HashMap::new());
    let svc = service(&store, without_episode);
    let outcome = svc.force_refresh().await.unwrap();
    assert_eq!(outcome.refreshed, 1);

    let schedule = svc.schedule(false).await.unwrap();
    assert_eq!(schedule.total, 0);
    assert!(schedule.upcoming.is_empty());

    // The empty result still counted as a fresh fetch.
    assert!(svc.identify_stale().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repeat_refresh_reports_the_same_episode() {
    let store = memory_store().await;
    store.add_show(&show(4, "Steady"), ShowStatus::Watching).await.unwrap();

    let screen = TrackingScreen::new(HashMap::from([(4, episode("2099-11-20"))]));
    let svc = service(&store, screen);

    svc.force_refresh().await.unwrap();
    let first = svc.schedule(false).await.unwrap().upcoming;

    svc.force_refresh().await.unwrap();
    let second = svc.schedule(false).await.unwrap().upcoming;

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].air_date, "2099-11-20");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_refresh_runs_in_windows_of_five() {
    let store = memory_store().await;
    for id in 1..=7 {
        store
            .add_show(&show(id, &format!("Show {id}")), ShowStatus::Watching)
            .await
            .unwrap();
    }

    let screen = TrackingScreen::new(HashMap::new());
    let svc = service(&store, screen.clone());

    let outcome = svc.force_refresh().await.unwrap();
    assert_eq!(outcome.refreshed, 7);

    assert_eq!(screen.max_in_flight.load(Ordering::SeqCst), 5);

    // The second window must not start until the first has fully settled.
    let starts = screen.starts.lock().unwrap();
    let ends = screen.ends.lock().unwrap();
    let first_window_done = (1..=5).map(|id| ends[&id]).max().unwrap();
    for id in 6..=7 {
        assert!(starts[&id] >= first_window_done);
    }
}

#[tokio::test]
async fn test_failed_show_stays_stale_while_others_stamp() {
    let store = memory_store().await;
    for id in 1..=3 {
        store
            .add_show(&show(id, &format!("Show {id}")), ShowStatus::Watching)
            .await
            .unwrap();
    }

    let screen = TrackingScreen::with_failures(HashMap::new(), vec![2]);
    let svc = service(&store, screen);

    let outcome = svc.refresh_stale().await.unwrap();
    assert_eq!(
        outcome,
        RefreshOutcome {
            refreshed: 2,
            failed: 1
        }
    );

    // Only the failed show is picked up by the next pass.
    assert_eq!(svc.identify_stale().await.unwrap(), vec![2]);
}

#[tokio::test]
async fn test_schedule_sorts_and_groups_by_month() {
    let store = memory_store().await;
    for id in 1..=3 {
        store
            .add_show(&show(id, &format!("Show {id}")), ShowStatus::Watching)
            .await
            .unwrap();
    }

    let screen = TrackingScreen::new(HashMap::from([
        (1, episode("2099-09-14")),
        (2, episode("2099-09-02")),
        (3, episode("2099-10-01")),
    ]));
    let svc = service(&store, screen);
    svc.force_refresh().await.unwrap();

    let schedule = svc.schedule(false).await.unwrap();
    assert_eq!(schedule.total, 3);

    let order: Vec<i32> = schedule.upcoming.iter().map(|r| r.show_id).collect();
    assert_eq!(order, vec![2, 1, 3]);

    let months: Vec<&String> = schedule.grouped.keys().collect();
    assert_eq!(months, vec!["2099-09", "2099-10"]);
    let september: Vec<i32> = schedule.grouped["2099-09"].iter().map(|r| r.show_id).collect();
    assert_eq!(september, vec![2, 1]);
}

struct NoBooks;

#[async_trait]
impl BookSource for NoBooks {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn search_books(&self, _query: &str, _limit: usize) -> Result<Vec<Book>, ProviderError> {
        Ok(Vec::new())
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
async fn test_upcoming_endpoints_refresh_and_report() {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let store = memory_store().await;
    store.add_show(&show(1, "Severance"), ShowStatus::Watching).await.unwrap();

    let screen = TrackingScreen::new(HashMap::from([(1, episode("2099-09-14"))]));
    let shared = SharedState::assemble(
        config,
        store,
        vec![Arc::new(NoBooks) as Arc<dyn BookSource>],
        screen.clone(),
        Arc::new(NoRecommender),
    );
    let state = trackarr::api::create_app_state(Arc::new(shared), None);
    let app = trackarr::api::router(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/upcoming?refresh=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["upcoming"][0]["showId"], 1);
    assert_eq!(body["upcoming"][0]["airDate"], "2099-09-14");
    assert_eq!(body["grouped"]["2099-09"][0]["title"], "Severance");
    assert_eq!(screen.detail_calls.load(Ordering::SeqCst), 1);

    // Freshly stamped, so a plain GET with refresh must not refetch.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/upcoming?refresh=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(screen.detail_calls.load(Ordering::SeqCst), 1);

    // The force endpoint bypasses staleness.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upcoming")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["refreshed"], 1);
    assert_eq!(screen.detail_calls.load(Ordering::SeqCst), 2);
}
