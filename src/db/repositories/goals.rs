use crate::domain::{BookStatus, MediaType, MovieStatus, ShowStatus};
use crate::entities::{goals, prelude::*, user_books, user_movies, user_shows};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

/// A goal with its computed progress: completed entries whose `updated_at`
/// falls in the goal year. Progress is derived at read time, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub id: i32,
    pub year: i32,
    pub media_type: String,
    pub target: i32,
    pub progress: u64,
}

pub struct GoalRepository {
    conn: DatabaseConnection,
}

impl GoalRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// One goal per `(year, media_type)`; setting it again updates the
    /// target.
    pub async fn set(&self, year: i32, media_type: MediaType, target: i32) -> anyhow::Result<()> {
        let model = goals::ActiveModel {
            year: Set(year),
            media_type: Set(media_type.as_str().to_string()),
            target: Set(target),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };
        Goals::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    goals::Column::Year,
                    goals::Column::MediaType,
                ])
                .update_columns([goals::Column::Target])
                .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn list_with_progress(&self, year: Option<i32>) -> anyhow::Result<Vec<GoalProgress>> {
        let mut query = Goals::find()
            .order_by_desc(goals::Column::Year)
            .order_by_asc(goals::Column::MediaType);
        if let Some(year) = year {
            query = query.filter(goals::Column::Year.eq(year));
        }
        let rows = query.all(&self.conn).await?;

        let mut out = Vec::with_capacity(rows.len());
        for goal in rows {
            let progress = match goal.media_type.parse::<MediaType>() {
                Ok(media_type) => self.completed_in_year(media_type, goal.year).await?,
                Err(_) => 0,
            };
            out.push(GoalProgress {
                id: goal.id,
                year: goal.year,
                media_type: goal.media_type,
                target: goal.target,
                progress,
            });
        }
        Ok(out)
    }

    pub async fn remove(&self, id: i32) -> anyhow::Result<bool> {
        let result = Goals::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// RFC3339 timestamps sort lexicographically, so the year window is a
    /// plain string range.
    async fn completed_in_year(&self, media_type: MediaType, year: i32) -> anyhow::Result<u64> {
        let start = format!("{year}-01-01");
        let end = format!("{}-01-01", year + 1);

        let count = match media_type {
            MediaType::Book => {
                UserBooks::find()
                    .filter(user_books::Column::Status.eq(BookStatus::Read.as_str()))
                    .filter(user_books::Column::UpdatedAt.gte(start))
                    .filter(user_books::Column::UpdatedAt.lt(end))
                    .count(&self.conn)
                    .await?
            }
            MediaType::Movie => {
                UserMovies::find()
                    .filter(user_movies::Column::Status.eq(MovieStatus::Watched.as_str()))
                    .filter(user_movies::Column::UpdatedAt.gte(start))
                    .filter(user_movies::Column::UpdatedAt.lt(end))
                    .count(&self.conn)
                    .await?
            }
            MediaType::Show => {
                UserShows::find()
                    .filter(user_shows::Column::Status.eq(ShowStatus::Watched.as_str()))
                    .filter(user_shows::Column::UpdatedAt.gte(start))
                    .filter(user_shows::Column::UpdatedAt.lt(end))
                    .count(&self.conn)
                    .await?
            }
        };
        Ok(count)
    }
}
