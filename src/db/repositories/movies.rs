use crate::domain::MovieStatus;
use crate::entities::{movies, prelude::*, user_movies};
use crate::models::Movie;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

/// A movie joined with its library entry, shaped for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryMovie {
    pub id: i32,
    pub title: String,
    pub original_title: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<String>,
    pub provider_rating: Option<f64>,
    pub status: String,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    pub added_at: String,
    pub updated_at: String,
}

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_library_row(movie: movies::Model, entry: user_movies::Model) -> LibraryMovie {
        LibraryMovie {
            id: movie.id,
            title: movie.title,
            original_title: movie.original_title,
            description: movie.overview,
            genres: movie
                .genres
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            cover_url: movie.poster_url,
            release_date: movie.release_date,
            provider_rating: movie.provider_rating,
            status: entry.status,
            rating: entry.rating,
            notes: entry.notes,
            added_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }

    fn provider_active_model(movie: &Movie, fetched_at: &str) -> movies::ActiveModel {
        movies::ActiveModel {
            id: Set(movie.id),
            title: Set(movie.title.clone()),
            original_title: Set(movie.original_title.clone()),
            overview: Set(movie.description.clone()),
            genres: Set(serde_json::to_string(&movie.genres).ok()),
            poster_url: Set(movie.cover_url.clone()),
            release_date: Set(movie.release_date.clone()),
            provider_rating: Set(movie.provider_rating),
            fetched_at: Set(fetched_at.to_string()),
        }
    }

    const PROVIDER_COLUMNS: [movies::Column; 8] = [
        movies::Column::Title,
        movies::Column::OriginalTitle,
        movies::Column::Overview,
        movies::Column::Genres,
        movies::Column::PosterUrl,
        movies::Column::ReleaseDate,
        movies::Column::ProviderRating,
        movies::Column::FetchedAt,
    ];

    /// Overwrites provider-sourced fields only; user fields live in
    /// `user_movies`.
    pub async fn upsert_movie(&self, movie: &Movie) -> anyhow::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        Movies::insert(Self::provider_active_model(movie, &now))
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(movies::Column::Id)
                    .update_columns(Self::PROVIDER_COLUMNS)
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    /// Returns true when a new entry was created; re-adds preserve the
    /// existing entry untouched.
    pub async fn add_to_library(
        &self,
        movie: &Movie,
        status: MovieStatus,
    ) -> anyhow::Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.conn.begin().await?;

        Movies::insert(Self::provider_active_model(movie, &now))
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(movies::Column::Id)
                    .update_columns(Self::PROVIDER_COLUMNS)
                    .to_owned(),
            )
            .exec(&txn)
            .await?;

        let entry = user_movies::ActiveModel {
            movie_id: Set(movie.id),
            status: Set(status.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        let inserted = match UserMovies::insert(entry)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(user_movies::Column::MovieId)
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
            info!("Added movie to library: {}", movie.title);
        }
        Ok(inserted)
    }

    pub async fn list_library(&self) -> anyhow::Result<Vec<LibraryMovie>> {
        let rows = UserMovies::find()
            .order_by_desc(user_movies::Column::UpdatedAt)
            .find_also_related(Movies)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, movie)| movie.map(|m| Self::map_library_row(m, entry)))
            .collect())
    }

    pub async fn get(&self, movie_id: i32) -> anyhow::Result<Option<LibraryMovie>> {
        let row = UserMovies::find()
            .filter(user_movies::Column::MovieId.eq(movie_id))
            .find_also_related(Movies)
            .one(&self.conn)
            .await?;

        Ok(row.and_then(|(entry, movie)| movie.map(|m| Self::map_library_row(m, entry))))
    }

    pub async fn update_entry(
        &self,
        movie_id: i32,
        status: Option<MovieStatus>,
        rating: Option<i32>,
        notes: Option<&str>,
    ) -> anyhow::Result<bool> {
        let mut update = UserMovies::update_many().col_expr(
            user_movies::Column::UpdatedAt,
            sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
        );
        if let Some(status) = status {
            update = update.col_expr(
                user_movies::Column::Status,
                sea_orm::sea_query::Expr::value(status.as_str()),
            );
        }
        if let Some(rating) = rating {
            update = update.col_expr(
                user_movies::Column::Rating,
                sea_orm::sea_query::Expr::value(rating),
            );
        }
        if let Some(notes) = notes {
            update = update.col_expr(
                user_movies::Column::Notes,
                sea_orm::sea_query::Expr::value(notes),
            );
        }

        let result = update
            .filter(user_movies::Column::MovieId.eq(movie_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn remove_from_library(&self, movie_id: i32) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await?;

        let result = UserMovies::delete_many()
            .filter(user_movies::Column::MovieId.eq(movie_id))
            .exec(&txn)
            .await?;
        Movies::delete_by_id(movie_id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed movie from library: {}", movie_id);
        }
        Ok(removed)
    }
}
