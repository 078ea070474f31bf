use std::sync::Arc;

use crate::clients::googlebooks::GoogleBooksClient;
use crate::clients::openai::OpenAiClient;
use crate::clients::openlibrary::OpenLibraryClient;
use crate::clients::tmdb::TmdbClient;
use crate::clients::{BookSource, Recommender, ScreenSource};
use crate::config::Config;
use crate::db::Store;
use crate::services::{RecommendationService, SearchService, UpcomingService};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("trackarr/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub search_service: Arc<SearchService>,

    pub upcoming_service: Arc<UpcomingService>,

    pub recommendation_service: Arc<RecommendationService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        // One pooled HTTP client behind every provider adapter.
        let http_client =
            build_shared_http_client(config.providers.request_timeout_seconds.into())?;

        let book_sources: Vec<Arc<dyn BookSource>> = vec![
            Arc::new(OpenLibraryClient::with_shared_client(http_client.clone())),
            Arc::new(GoogleBooksClient::with_shared_client(http_client.clone())),
        ];
        let screen = Arc::new(TmdbClient::with_shared_client(
            http_client.clone(),
            config.providers.tmdb_api_key.clone(),
        )) as Arc<dyn ScreenSource>;
        let recommender = Arc::new(OpenAiClient::with_shared_client(
            http_client,
            config.providers.openai_api_key.clone(),
            config.providers.openai_model.clone(),
        )) as Arc<dyn Recommender>;

        Ok(Self::assemble(config, store, book_sources, screen, recommender))
    }

    /// Wires the service layer onto explicit provider handles. Tests use
    /// this to swap in scripted providers without touching the network.
    #[must_use]
    pub fn assemble(
        config: Config,
        store: Store,
        book_sources: Vec<Arc<dyn BookSource>>,
        screen: Arc<dyn ScreenSource>,
        recommender: Arc<dyn Recommender>,
    ) -> Self {
        let search_service = Arc::new(SearchService::new(book_sources, screen.clone()));
        let upcoming_service = Arc::new(UpcomingService::new(
            store.clone(),
            screen,
            i64::from(config.refresh.staleness_hours),
            config.refresh.batch_size,
        ));
        let recommendation_service = Arc::new(RecommendationService::new(
            store.clone(),
            recommender,
            config.recommendations.max_context_items,
        ));

        Self {
            config,
            store,
            search_service,
            upcoming_service,
            recommendation_service,
        }
    }
}
