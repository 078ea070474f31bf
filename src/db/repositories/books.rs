use crate::domain::BookStatus;
use crate::entities::{books, prelude::*, user_books};
use crate::models::Book;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

/// A book joined with its library entry, shaped for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryBook {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub cover_url: Option<String>,
    pub first_publish_year: Option<i32>,
    pub provider_rating: Option<f64>,
    pub status: String,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    pub added_at: String,
    pub updated_at: String,
}

pub struct BookRepository {
    conn: DatabaseConnection,
}

impl BookRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_library_row(book: books::Model, entry: user_books::Model) -> LibraryBook {
        LibraryBook {
            id: book.id,
            title: book.title,
            authors: serde_json::from_str(&book.authors).unwrap_or_default(),
            description: book.description,
            genres: book
                .genres
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            cover_url: book.cover_url,
            first_publish_year: book.first_publish_year,
            provider_rating: book.provider_rating,
            status: entry.status,
            rating: entry.rating,
            notes: entry.notes,
            added_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }

    fn provider_active_model(book: &Book, fetched_at: &str) -> books::ActiveModel {
        books::ActiveModel {
            id: Set(book.id.clone()),
            title: Set(book.title.clone()),
            authors: Set(serde_json::to_string(&book.authors).unwrap_or_else(|_| "[]".to_string())),
            description: Set(book.description.clone()),
            genres: Set(serde_json::to_string(&book.genres).ok()),
            cover_url: Set(book.cover_url.clone()),
            first_publish_year: Set(book.first_publish_year),
            provider_rating: Set(book.provider_rating),
            fetched_at: Set(fetched_at.to_string()),
        }
    }

    const PROVIDER_COLUMNS: [books::Column; 8] = [
        books::Column::Title,
        books::Column::Authors,
        books::Column::Description,
        books::Column::Genres,
        books::Column::CoverUrl,
        books::Column::FirstPublishYear,
        books::Column::ProviderRating,
        books::Column::FetchedAt,
    ];

    /// Overwrites provider-sourced fields only. User fields live in
    /// `user_books` and are structurally out of reach here.
    pub async fn upsert_book(&self, book: &Book) -> anyhow::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        Books::insert(Self::provider_active_model(book, &now))
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(books::Column::Id)
                    .update_columns(Self::PROVIDER_COLUMNS)
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    /// Returns true when a new entry was created. Re-adding an already
    /// tracked book refreshes provider fields but leaves the existing entry
    /// (status, rating, notes) untouched.
    pub async fn add_to_library(&self, book: &Book, status: BookStatus) -> anyhow::Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.conn.begin().await?;

        Books::insert(Self::provider_active_model(book, &now))
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(books::Column::Id)
                    .update_columns(Self::PROVIDER_COLUMNS)
                    .to_owned(),
            )
            .exec(&txn)
            .await?;

        let entry = user_books::ActiveModel {
            book_id: Set(book.id.clone()),
            status: Set(status.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        let inserted = match UserBooks::insert(entry)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(user_books::Column::BookId)
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
            info!("Added book to library: {}", book.title);
        }
        Ok(inserted)
    }

    pub async fn list_library(&self) -> anyhow::Result<Vec<LibraryBook>> {
        let rows = UserBooks::find()
            .order_by_desc(user_books::Column::UpdatedAt)
            .find_also_related(Books)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, book)| book.map(|b| Self::map_library_row(b, entry)))
            .collect())
    }

    pub async fn get(&self, book_id: &str) -> anyhow::Result<Option<LibraryBook>> {
        let row = UserBooks::find()
            .filter(user_books::Column::BookId.eq(book_id))
            .find_also_related(Books)
            .one(&self.conn)
            .await?;

        Ok(row.and_then(|(entry, book)| book.map(|b| Self::map_library_row(b, entry))))
    }

    /// Applies the provided fields and stamps `updated_at`. Returns false
    /// when the book is not in the library.
    pub async fn update_entry(
        &self,
        book_id: &str,
        status: Option<BookStatus>,
        rating: Option<i32>,
        notes: Option<&str>,
    ) -> anyhow::Result<bool> {
        let mut update = UserBooks::update_many().col_expr(
            user_books::Column::UpdatedAt,
            sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
        );
        if let Some(status) = status {
            update = update.col_expr(
                user_books::Column::Status,
                sea_orm::sea_query::Expr::value(status.as_str()),
            );
        }
        if let Some(rating) = rating {
            update = update.col_expr(
                user_books::Column::Rating,
                sea_orm::sea_query::Expr::value(rating),
            );
        }
        if let Some(notes) = notes {
            update = update.col_expr(
                user_books::Column::Notes,
                sea_orm::sea_query::Expr::value(notes),
            );
        }

        let result = update
            .filter(user_books::Column::BookId.eq(book_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn remove_from_library(&self, book_id: &str) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await?;

        let result = UserBooks::delete_many()
            .filter(user_books::Column::BookId.eq(book_id))
            .exec(&txn)
            .await?;
        Books::delete_by_id(book_id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed book from library: {}", book_id);
        }
        Ok(removed)
    }
}
