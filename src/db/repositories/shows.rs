use crate::domain::ShowStatus;
use crate::entities::{prelude::*, shows, user_shows};
use crate::models::{NextEpisode, Show, ShowDetails, UpcomingRelease};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

/// Provider lifecycle values that make a show ineligible for further
/// upcoming-episode refreshes.
const TERMINAL_STATUSES: [&str; 2] = ["Ended", "Canceled"];

/// A show joined with its library entry, shaped for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryShow {
    pub id: i32,
    pub title: String,
    pub original_title: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub cover_url: Option<String>,
    pub first_air_date: Option<String>,
    pub provider_rating: Option<f64>,
    pub provider_status: Option<String>,
    pub next_episode: Option<NextEpisode>,
    pub status: String,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    pub current_season: Option<i32>,
    pub current_episode: Option<i32>,
    pub added_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, FromQueryResult)]
struct UpcomingShowRow {
    show_id: i32,
    title: String,
    cover_url: Option<String>,
    air_date: String,
    season: i32,
    episode: i32,
    episode_name: Option<String>,
}

pub struct ShowRepository {
    conn: DatabaseConnection,
}

impl ShowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_library_row(show: shows::Model, entry: user_shows::Model) -> LibraryShow {
        let next_episode = match (
            show.next_episode_air_date,
            show.next_episode_season,
            show.next_episode_number,
        ) {
            (Some(air_date), Some(season), Some(episode)) => Some(NextEpisode {
                air_date,
                season,
                episode,
                name: show.next_episode_name,
            }),
            _ => None,
        };

        LibraryShow {
            id: show.id,
            title: show.title,
            original_title: show.original_title,
            description: show.overview,
            genres: show
                .genres
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            cover_url: show.poster_url,
            first_air_date: show.first_air_date,
            provider_rating: show.provider_rating,
            provider_status: show.provider_status,
            next_episode,
            status: entry.status,
            rating: entry.rating,
            notes: entry.notes,
            current_season: entry.current_season,
            current_episode: entry.current_episode,
            added_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }

    fn provider_active_model(show: &Show, fetched_at: &str) -> shows::ActiveModel {
        shows::ActiveModel {
            id: Set(show.id),
            title: Set(show.title.clone()),
            original_title: Set(show.original_title.clone()),
            overview: Set(show.description.clone()),
            genres: Set(serde_json::to_string(&show.genres).ok()),
            poster_url: Set(show.cover_url.clone()),
            first_air_date: Set(show.first_air_date.clone()),
            provider_rating: Set(show.provider_rating),
            provider_status: Set(show.provider_status.clone()),
            fetched_at: Set(fetched_at.to_string()),
            ..Default::default()
        }
    }

    /// Provider columns overwritten by upserts. The next_episode_* columns
    /// and `upcoming_updated_at` are deliberately absent: only
    /// `record_refresh` writes those. `provider_status` is overwritten so a
    /// re-added show sheds a stale terminal status.
    const PROVIDER_COLUMNS: [shows::Column; 9] = [
        shows::Column::Title,
        shows::Column::OriginalTitle,
        shows::Column::Overview,
        shows::Column::Genres,
        shows::Column::PosterUrl,
        shows::Column::FirstAirDate,
        shows::Column::ProviderRating,
        shows::Column::ProviderStatus,
        shows::Column::FetchedAt,
    ];

    pub async fn upsert_show(&self, show: &Show) -> anyhow::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        Shows::insert(Self::provider_active_model(show, &now))
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(shows::Column::Id)
                    .update_columns(Self::PROVIDER_COLUMNS)
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    /// Returns true when a new entry was created; re-adds preserve the
    /// existing entry untouched.
    pub async fn add_to_library(&self, show: &Show, status: ShowStatus) -> anyhow::Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.conn.begin().await?;

        Shows::insert(Self::provider_active_model(show, &now))
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(shows::Column::Id)
                    .update_columns(Self::PROVIDER_COLUMNS)
                    .to_owned(),
            )
            .exec(&txn)
            .await?;

        let entry = user_shows::ActiveModel {
            show_id: Set(show.id),
            status: Set(status.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        let inserted = match UserShows::insert(entry)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(user_shows::Column::ShowId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&txn)
            .await
        {
            Ok(_) => true,
            Err(sea_orm::DbErr::RecordNotInserted) => false,
            Err(e) => return Err(e.into()),
        };

        txn.commit().await?;

        if inserted {
            info!("Added show to library: {}", show.title);
        }
        Ok(inserted)
    }

    pub async fn list_library(&self) -> anyhow::Result<Vec<LibraryShow>> {
        let rows = UserShows::find()
            .order_by_desc(user_shows::Column::UpdatedAt)
            .find_also_related(Shows)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, show)| show.map(|s| Self::map_library_row(s, entry)))
            .collect())
    }

    pub async fn get(&self, show_id: i32) -> anyhow::Result<Option<LibraryShow>> {
        let row = UserShows::find()
            .filter(user_shows::Column::ShowId.eq(show_id))
            .find_also_related(Shows)
            .one(&self.conn)
            .await?;

        Ok(row.and_then(|(entry, show)| show.map(|s| Self::map_library_row(s, entry))))
    }

    pub async fn update_entry(
        &self,
        show_id: i32,
        status: Option<ShowStatus>,
        rating: Option<i32>,
        notes: Option<&str>,
        current_season: Option<i32>,
        current_episode: Option<i32>,
    ) -> anyhow::Result<bool> {
        let mut update = UserShows::update_many().col_expr(
            user_shows::Column::UpdatedAt,
            sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
        );
        if let Some(status) = status {
            update = update.col_expr(
                user_shows::Column::Status,
                sea_orm::sea_query::Expr::value(status.as_str()),
            );
        }
        if let Some(rating) = rating {
            update = update.col_expr(
                user_shows::Column::Rating,
                sea_orm::sea_query::Expr::value(rating),
            );
        }
        if let Some(notes) = notes {
            update = update.col_expr(
                user_shows::Column::Notes,
                sea_orm::sea_query::Expr::value(notes),
            );
        }
        if let Some(season) = current_season {
            update = update.col_expr(
                user_shows::Column::CurrentSeason,
                sea_orm::sea_query::Expr::value(season),
            );
        }
        if let Some(episode) = current_episode {
            update = update.col_expr(
                user_shows::Column::CurrentEpisode,
                sea_orm::sea_query::Expr::value(episode),
            );
        }

        let result = update
            .filter(user_shows::Column::ShowId.eq(show_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn remove_from_library(&self, show_id: i32) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await?;

        let result = UserShows::delete_many()
            .filter(user_shows::Column::ShowId.eq(show_id))
            .exec(&txn)
            .await?;
        Shows::delete_by_id(show_id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed show from library: {}", show_id);
        }
        Ok(removed)
    }

    fn refreshable_query() -> sea_orm::Select<Shows> {
        let active: Vec<&str> = ShowStatus::ACTIVE.iter().map(|s| s.as_str()).collect();
        Shows::find()
            .select_only()
            .column(shows::Column::Id)
            .join(JoinType::InnerJoin, shows::Relation::UserShows.def())
            .filter(user_shows::Column::Status.is_in(active))
            .filter(
                Condition::any()
                    .add(shows::Column::ProviderStatus.is_null())
                    .add(shows::Column::ProviderStatus.is_not_in(TERMINAL_STATUSES)),
            )
            .order_by_asc(shows::Column::Id)
    }

    /// Shows whose upcoming data was never fetched or is older than the
    /// cutoff, excluding terminal-lifecycle shows and inactive entries.
    pub async fn find_stale_ids(&self, cutoff: &str) -> anyhow::Result<Vec<i32>> {
        let ids = Self::refreshable_query()
            .filter(
                Condition::any()
                    .add(shows::Column::UpcomingUpdatedAt.is_null())
                    .add(shows::Column::UpcomingUpdatedAt.lt(cutoff)),
            )
            .into_tuple()
            .all(&self.conn)
            .await?;
        Ok(ids)
    }

    /// All refresh-eligible shows regardless of staleness (force path).
    pub async fn find_refreshable_ids(&self) -> anyhow::Result<Vec<i32>> {
        let ids = Self::refreshable_query().into_tuple().all(&self.conn).await?;
        Ok(ids)
    }

    /// Applies one successful detail fetch: provider lifecycle, the four
    /// next-episode columns (all set or all cleared), and the freshness
    /// stamp, in a single UPDATE. A "no next episode" result still advances
    /// the stamp so the show is not retried every cycle.
    pub async fn record_refresh(&self, show_id: i32, details: &ShowDetails) -> anyhow::Result<()> {
        let next = details.next_episode.as_ref();
        Shows::update_many()
            .col_expr(
                shows::Column::ProviderStatus,
                sea_orm::sea_query::Expr::value(details.status.clone()),
            )
            .col_expr(
                shows::Column::NextEpisodeAirDate,
                sea_orm::sea_query::Expr::value(next.map(|e| e.air_date.clone())),
            )
            .col_expr(
                shows::Column::NextEpisodeSeason,
                sea_orm::sea_query::Expr::value(next.map(|e| e.season)),
            )
            .col_expr(
                shows::Column::NextEpisodeNumber,
                sea_orm::sea_query::Expr::value(next.map(|e| e.episode)),
            )
            .col_expr(
                shows::Column::NextEpisodeName,
                sea_orm::sea_query::Expr::value(next.and_then(|e| e.name.clone())),
            )
            .col_expr(
                shows::Column::UpcomingUpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(shows::Column::Id.eq(show_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    /// Scheduled episodes for active entries with an air date on or after
    /// `today`, soonest first. Past air dates drop out here rather than via
    /// an explicit state transition.
    pub async fn upcoming(&self, today: &str) -> anyhow::Result<Vec<UpcomingRelease>> {
        let active: Vec<&str> = ShowStatus::ACTIVE.iter().map(|s| s.as_str()).collect();
        let rows = Shows::find()
            .select_only()
            .column_as(shows::Column::Id, "show_id")
            .column(shows::Column::Title)
            .column_as(shows::Column::PosterUrl, "cover_url")
            .column_as(shows::Column::NextEpisodeAirDate, "air_date")
            .column_as(shows::Column::NextEpisodeSeason, "season")
            .column_as(shows::Column::NextEpisodeNumber, "episode")
            .column_as(shows::Column::NextEpisodeName, "episode_name")
            .join(JoinType::InnerJoin, shows::Relation::UserShows.def())
            .filter(user_shows::Column::Status.is_in(active))
            .filter(shows::Column::NextEpisodeAirDate.is_not_null())
            .filter(shows::Column::NextEpisodeAirDate.gte(today))
            .order_by_asc(shows::Column::NextEpisodeAirDate)
            .into_model::<UpcomingShowRow>()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| UpcomingRelease {
                show_id: r.show_id,
                title: r.title,
                cover_url: r.cover_url,
                air_date: r.air_date,
                season: r.season,
                episode: r.episode,
                episode_name: r.episode_name,
            })
            .collect())
    }
}
