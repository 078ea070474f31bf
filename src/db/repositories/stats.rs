use crate::entities::{prelude::*, user_books, user_movies, user_shows};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-media-type aggregate for the `/stats` endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaStats {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, FromQueryResult)]
struct StatusCountRow {
    status: String,
    count: i64,
}

pub struct StatsRepository {
    conn: DatabaseConnection,
}

impl StatsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn fold(rows: Vec<StatusCountRow>, ratings: &[i32]) -> MediaStats {
        let mut by_status = BTreeMap::new();
        let mut total = 0;
        for row in rows {
            total += row.count;
            by_status.insert(row.status, row.count);
        }

        #[allow(clippy::cast_precision_loss)]
        let average_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64)
        };

        MediaStats {
            total,
            by_status,
            average_rating,
        }
    }

    pub async fn book_stats(&self) -> anyhow::Result<MediaStats> {
        let rows = UserBooks::find()
            .select_only()
            .column(user_books::Column::Status)
            .column_as(user_books::Column::Id.count(), "count")
            .group_by(user_books::Column::Status)
            .into_model::<StatusCountRow>()
            .all(&self.conn)
            .await?;
        let ratings: Vec<i32> = UserBooks::find()
            .select_only()
            .column(user_books::Column::Rating)
            .filter(user_books::Column::Rating.is_not_null())
            .into_tuple()
            .all(&self.conn)
            .await?;
        Ok(Self::fold(rows, &ratings))
    }

    pub async fn movie_stats(&self) -> anyhow::Result<MediaStats> {
        let rows = UserMovies::find()
            .select_only()
            .column(user_movies::Column::Status)
            .column_as(user_movies::Column::Id.count(), "count")
            .group_by(user_movies::Column::Status)
            .into_model::<StatusCountRow>()
            .all(&self.conn)
            .await?;
        let ratings: Vec<i32> = UserMovies::find()
            .select_only()
            .column(user_movies::Column::Rating)
            .filter(user_movies::Column::Rating.is_not_null())
            .into_tuple()
            .all(&self.conn)
            .await?;
        Ok(Self::fold(rows, &ratings))
    }

    pub async fn show_stats(&self) -> anyhow::Result<MediaStats> {
        let rows = UserShows::find()
            .select_only()
            .column(user_shows::Column::Status)
            .column_as(user_shows::Column::Id.count(), "count")
            .group_by(user_shows::Column::Status)
            .into_model::<StatusCountRow>()
            .all(&self.conn)
            .await?;
        let ratings: Vec<i32> = UserShows::find()
            .select_only()
            .column(user_shows::Column::Rating)
            .filter(user_shows::Column::Rating.is_not_null())
            .into_tuple()
            .all(&self.conn)
            .await?;
        Ok(Self::fold(rows, &ratings))
    }
}
