use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::clients::ScreenSource;
use crate::db::Store;
use crate::models::UpcomingRelease;

/// Counts from one refresh run. Failures are already logged by the time the
/// outcome is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshOutcome {
    pub refreshed: usize,
    pub failed: usize,
}

/// The upcoming endpoint payload: a flat date-ordered list plus the same
/// releases grouped by `YYYY-MM` month key.
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingSchedule {
    pub upcoming: Vec<UpcomingRelease>,
    pub grouped: BTreeMap<String, Vec<UpcomingRelease>>,
    pub total: usize,
}

pub struct UpcomingService {
    store: Store,
    screen: Arc<dyn ScreenSource>,
    staleness_hours: i64,
    batch_size: usize,
}

impl UpcomingService {
    #[must_use]
    pub const fn new(
        store: Store,
        screen: Arc<dyn ScreenSource>,
        staleness_hours: i64,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            screen,
            staleness_hours,
            batch_size,
        }
    }

    /// Shows whose next-episode data was never fetched or has aged past the
    /// staleness threshold. Terminal and non-active shows are already
    /// filtered out by the store query.
    pub async fn identify_stale(&self) -> anyhow::Result<Vec<i32>> {
        let cutoff = Utc::now()
            .checked_sub_signed(chrono::Duration::hours(self.staleness_hours))
            .map_or_else(|| "1970-01-01T00:00:00Z".to_string(), |t| t.to_rfc3339());

        self.store.find_stale_show_ids(&cutoff).await
    }

    /// Refreshes `ids` in fixed-size windows. Within a window all fetches run
    /// concurrently; a new window starts only after the previous one has
    /// fully settled. One failing show never blocks its siblings.
    pub async fn refresh_batch(&self, ids: &[i32]) -> RefreshOutcome {
        let mut outcome = RefreshOutcome::default();

        for window in ids.chunks(self.batch_size.max(1)) {
            let results = join_all(window.iter().map(|&id| self.refresh_one(id))).await;
            for ok in results {
                if ok {
                    outcome.refreshed += 1;
                } else {
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }

    async fn refresh_one(&self, show_id: i32) -> bool {
        let details = match self.screen.fetch_show_details(show_id).await {
            Ok(details) => details,
            Err(e) => {
                warn!("Upcoming refresh fetch for show {} failed: {}", show_id, e);
                return false;
            }
        };

        match self.store.record_show_refresh(show_id, &details).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Recording refresh for show {} failed: {}", show_id, e);
                false
            }
        }
    }

    pub async fn refresh_stale(&self) -> anyhow::Result<RefreshOutcome> {
        let stale = self.identify_stale().await?;
        if stale.is_empty() {
            return Ok(RefreshOutcome::default());
        }

        info!("Refreshing {} stale shows", stale.len());
        Ok(self.refresh_batch(&stale).await)
    }

    /// Force path: skips the staleness check and refreshes every show that
    /// is still eligible (active in the library, not marked terminal).
    pub async fn force_refresh(&self) -> anyhow::Result<RefreshOutcome> {
        let ids = self.store.find_refreshable_show_ids().await?;
        if ids.is_empty() {
            return Ok(RefreshOutcome::default());
        }

        info!("Force refreshing {} shows", ids.len());
        Ok(self.refresh_batch(&ids).await)
    }

    /// Lists upcoming releases from today forward, optionally refreshing
    /// stale shows first so the listing reflects current upstream data.
    pub async fn schedule(&self, refresh: bool) -> anyhow::Result<UpcomingSchedule> {
        if refresh {
            self.refresh_stale().await?;
        }

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let upcoming = self.store.upcoming_shows(&today).await?;
        let grouped = group_by_month(&upcoming);
        let total = upcoming.len();

        Ok(UpcomingSchedule {
            upcoming,
            grouped,
            total,
        })
    }
}

/// `YYYY-MM` prefix of an ISO date.
fn month_key(air_date: &str) -> Option<&str> {
    air_date.get(..7)
}

fn group_by_month(releases: &[UpcomingRelease]) -> BTreeMap<String, Vec<UpcomingRelease>> {
    let mut grouped: BTreeMap<String, Vec<UpcomingRelease>> = BTreeMap::new();
    for release in releases {
        let Some(key) = month_key(&release.air_date) else {
            continue;
        };
        grouped.entry(key.to_string()).or_default().push(release.clone());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(show_id: i32, air_date: &str) -> UpcomingRelease {
        UpcomingRelease {
            show_id,
            title: format!("Show {show_id}"),
            cover_url: None,
            air_date: air_date.to_string(),
            season: 1,
            episode: 1,
            episode_name: None,
        }
    }

    #[test]
    fn month_keys_are_seven_character_prefixes() {
        assert_eq!(month_key("2026-09-14"), Some("2026-09"));
        assert_eq!(month_key("2026-09"), Some("2026-09"));
        assert_eq!(month_key("junk"), None);
    }

    #[test]
    fn grouping_preserves_date_order_within_each_month() {
        let releases = vec![
            release(1, "2026-09-02"),
            release(2, "2026-09-14"),
            release(3, "2026-10-01"),
        ];
        let grouped = group_by_month(&releases);

        assert_eq!(grouped.len(), 2);
        let september: Vec<i32> = grouped["2026-09"].iter().map(|r| r.show_id).collect();
        assert_eq!(september, vec![1, 2]);
        assert_eq!(grouped["2026-10"].len(), 1);
    }

    #[test]
    fn malformed_air_dates_are_skipped_not_panicked() {
        let grouped = group_by_month(&[release(1, "bad")]);
        assert!(grouped.is_empty());
    }
}
