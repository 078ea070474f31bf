use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod dismissed;
mod error;
mod goals;
mod health;
mod library;
mod observability;
mod recommendations;
mod reviews;
mod search;
mod stats;
mod tropes;
mod types;
mod upcoming;
mod validation;
mod wishlist;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn search_service(&self) -> &Arc<crate::services::SearchService> {
        &self.shared.search_service
    }

    #[must_use]
    pub fn upcoming_service(&self) -> &Arc<crate::services::UpcomingService> {
        &self.shared.upcoming_service
    }

    #[must_use]
    pub fn recommendation_service(&self) -> &Arc<crate::services::RecommendationService> {
        &self.shared.recommendation_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/health", get(health::get_health))
        .route("/search", get(search::search))
        .route("/upcoming", get(upcoming::list_upcoming))
        .route("/upcoming", post(upcoming::force_refresh))
        .route("/recommendations/ask", post(recommendations::ask))
        .route("/recommendations/surprise", get(recommendations::surprise))
        .route("/library/books", get(library::list_books))
        .route("/library/books", post(library::add_book))
        .route("/library/books/{id}", patch(library::update_book))
        .route("/library/books/{id}", delete(library::remove_book))
        .route("/library/movies", get(library::list_movies))
        .route("/library/movies", post(library::add_movie))
        .route("/library/movies/{id}", patch(library::update_movie))
        .route("/library/movies/{id}", delete(library::remove_movie))
        .route("/library/shows", get(library::list_shows))
        .route("/library/shows", post(library::add_show))
        .route("/library/shows/{id}", patch(library::update_show))
        .route("/library/shows/{id}", delete(library::remove_show))
        .route("/wishlist", get(wishlist::list_wishlist))
        .route("/wishlist", post(wishlist::add_wishlist_item))
        .route("/wishlist/{id}", delete(wishlist::remove_wishlist_item))
        .route("/dismissed", get(dismissed::list_dismissed))
        .route("/dismissed", post(dismissed::add_dismissed))
        .route("/dismissed/{id}", delete(dismissed::remove_dismissed))
        .route("/tropes", get(tropes::list_tropes))
        .route("/tropes", put(tropes::set_trope))
        .route("/tropes/bulk", put(tropes::replace_tropes))
        .route("/tropes/{trope}", delete(tropes::remove_trope))
        .route("/reviews", get(reviews::list_reviews))
        .route("/reviews", post(reviews::save_review))
        .route("/reviews/{id}", delete(reviews::remove_review))
        .route("/goals", get(goals::list_goals))
        .route("/goals", post(goals::set_goal))
        .route("/goals/{id}", delete(goals::remove_goal))
        .route("/stats", get(stats::get_stats))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}
