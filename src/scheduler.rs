use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::RefreshConfig;
use crate::services::UpcomingService;

/// Background driver for the upcoming-episode refresh. Runs on a cron
/// expression when one is configured, otherwise on a fixed interval.
pub struct Scheduler {
    upcoming: Arc<UpcomingService>,
    config: RefreshConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    #[must_use]
    pub fn new(upcoming: Arc<UpcomingService>, config: RefreshConfig) -> Self {
        Self {
            upcoming,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.auto_refresh_enabled {
            info!("Automatic refresh is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let upcoming = Arc::clone(&self.upcoming);
        let running = Arc::clone(&self.running);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let upcoming = Arc::clone(&upcoming);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                run_refresh(&upcoming).await;
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_mins = self.config.check_interval_minutes.max(1);
        info!("Scheduler running: refresh check every {}m", interval_mins);

        let mut check_interval = interval(Duration::from_secs(u64::from(interval_mins) * 60));

        loop {
            check_interval.tick().await;
            if !*self.running.read().await {
                break;
            }
            run_refresh(&self.upcoming).await;
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

async fn run_refresh(upcoming: &UpcomingService) {
    let start = std::time::Instant::now();
    info!(
        event = "job_started",
        job_name = "refresh_upcoming",
        "Starting scheduled upcoming refresh"
    );

    match upcoming.refresh_stale().await {
        Ok(outcome) => info!(
            event = "job_finished",
            job_name = "refresh_upcoming",
            refreshed = outcome.refreshed,
            failed = outcome.failed,
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Scheduled upcoming refresh finished"
        ),
        Err(e) => error!(
            event = "job_failed",
            job_name = "refresh_upcoming",
            error = %e,
            "Scheduled upcoming refresh failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ProviderError, ScreenSource};
    use crate::db::Store;
    use crate::models::{Movie, Show, ShowDetails};
    use async_trait::async_trait;

    struct IdleScreen;

    #[async_trait]
    impl ScreenSource for IdleScreen {
        async fn search_movies(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<Movie>, ProviderError> {
            Ok(Vec::new())
        }

        async fn search_shows(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<Show>, ProviderError> {
            Ok(Vec::new())
        }

        async fn fetch_show_details(&self, _id: i32) -> Result<ShowDetails, ProviderError> {
            Err(ProviderError::MissingCredential("TMDB_API_KEY"))
        }
    }

    async fn scheduler_with(config: RefreshConfig) -> Scheduler {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let upcoming = Arc::new(UpcomingService::new(store, Arc::new(IdleScreen), 24, 5));
        Scheduler::new(upcoming, config)
    }

    #[tokio::test]
    async fn disabled_scheduler_returns_without_running() {
        let config = RefreshConfig {
            auto_refresh_enabled: false,
            ..RefreshConfig::default()
        };
        let scheduler = scheduler_with(config).await;

        scheduler.start().await.unwrap();
        assert!(!scheduler.is_running().await);
    }

    #[tokio::test]
    async fn stop_flips_the_running_flag() {
        let scheduler = scheduler_with(RefreshConfig::default()).await;

        *scheduler.running.write().await = true;
        assert!(scheduler.is_running().await);

        scheduler.stop().await;
        assert!(!scheduler.is_running().await);
    }
}
