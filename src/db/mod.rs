use crate::domain::{BookStatus, MediaType, MovieStatus, ShowStatus, TropeAffinity};
use crate::models::{Book, Movie, Show, ShowDetails, UpcomingRelease};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::entities::dismissed_media::Model as DismissedItem;
pub use crate::entities::reviews::Model as Review;
pub use crate::entities::trope_preferences::Model as TropePreference;
pub use crate::entities::wishlist::Model as WishlistItem;
pub use repositories::books::LibraryBook;
pub use repositories::goals::GoalProgress;
pub use repositories::movies::LibraryMovie;
pub use repositories::shows::LibraryShow;
pub use repositories::stats::MediaStats;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:") || db_url.contains("mode=memory");
        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Each pooled connection to a memory database would see its own
        // empty database, so memory URLs get exactly one connection.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn book_repo(&self) -> repositories::books::BookRepository {
        repositories::books::BookRepository::new(self.conn.clone())
    }

    fn movie_repo(&self) -> repositories::movies::MovieRepository {
        repositories::movies::MovieRepository::new(self.conn.clone())
    }

    fn show_repo(&self) -> repositories::shows::ShowRepository {
        repositories::shows::ShowRepository::new(self.conn.clone())
    }

    fn dismissed_repo(&self) -> repositories::exclusions::DismissedRepository {
        repositories::exclusions::DismissedRepository::new(self.conn.clone())
    }

    fn wishlist_repo(&self) -> repositories::exclusions::WishlistRepository {
        repositories::exclusions::WishlistRepository::new(self.conn.clone())
    }

    fn trope_repo(&self) -> repositories::tropes::TropeRepository {
        repositories::tropes::TropeRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::reviews::ReviewRepository {
        repositories::reviews::ReviewRepository::new(self.conn.clone())
    }

    fn goal_repo(&self) -> repositories::goals::GoalRepository {
        repositories::goals::GoalRepository::new(self.conn.clone())
    }

    fn stats_repo(&self) -> repositories::stats::StatsRepository {
        repositories::stats::StatsRepository::new(self.conn.clone())
    }

    // ------------------------------------------------------------------
    // Books
    // ------------------------------------------------------------------

    pub async fn upsert_book(&self, book: &Book) -> Result<()> {
        self.book_repo().upsert_book(book).await
    }

    pub async fn add_book(&self, book: &Book, status: BookStatus) -> Result<bool> {
        self.book_repo().add_to_library(book, status).await
    }

    pub async fn list_books(&self) -> Result<Vec<LibraryBook>> {
        self.book_repo().list_library().await
    }

    pub async fn get_book(&self, id: &str) -> Result<Option<LibraryBook>> {
        self.book_repo().get(id).await
    }

    pub async fn update_book_entry(
        &self,
        id: &str,
        status: Option<BookStatus>,
        rating: Option<i32>,
        notes: Option<&str>,
    ) -> Result<bool> {
        self.book_repo().update_entry(id, status, rating, notes).await
    }

    pub async fn remove_book(&self, id: &str) -> Result<bool> {
        self.book_repo().remove_from_library(id).await
    }

    // ------------------------------------------------------------------
    // Movies
    // ------------------------------------------------------------------

    pub async fn upsert_movie(&self, movie: &Movie) -> Result<()> {
        self.movie_repo().upsert_movie(movie).await
    }

    pub async fn add_movie(&self, movie: &Movie, status: MovieStatus) -> Result<bool> {
        self.movie_repo().add_to_library(movie, status).await
    }

    pub async fn list_movies(&self) -> Result<Vec<LibraryMovie>> {
        self.movie_repo().list_library().await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<LibraryMovie>> {
        self.movie_repo().get(id).await
    }

    pub async fn update_movie_entry(
        &self,
        id: i32,
        status: Option<MovieStatus>,
        rating: Option<i32>,
        notes: Option<&str>,
    ) -> Result<bool> {
        self.movie_repo().update_entry(id, status, rating, notes).await
    }

    pub async fn remove_movie(&self, id: i32) -> Result<bool> {
        self.movie_repo().remove_from_library(id).await
    }

    // ------------------------------------------------------------------
    // Shows
    // ------------------------------------------------------------------

    pub async fn upsert_show(&self, show: &Show) -> Result<()> {
        self.show_repo().upsert_show(show).await
    }

    pub async fn add_show(&self, show: &Show, status: ShowStatus) -> Result<bool> {
        self.show_repo().add_to_library(show, status).await
    }

    pub async fn list_shows(&self) -> Result<Vec<LibraryShow>> {
        self.show_repo().list_library().await
    }

    pub async fn get_show(&self, id: i32) -> Result<Option<LibraryShow>> {
        self.show_repo().get(id).await
    }

    pub async fn update_show_entry(
        &self,
        id: i32,
        status: Option<ShowStatus>,
        rating: Option<i32>,
        notes: Option<&str>,
        current_season: Option<i32>,
        current_episode: Option<i32>,
    ) -> Result<bool> {
        self.show_repo()
            .update_entry(id, status, rating, notes, current_season, current_episode)
            .await
    }

    pub async fn remove_show(&self, id: i32) -> Result<bool> {
        self.show_repo().remove_from_library(id).await
    }

    pub async fn find_stale_show_ids(&self, cutoff: &str) -> Result<Vec<i32>> {
        self.show_repo().find_stale_ids(cutoff).await
    }

    pub async fn find_refreshable_show_ids(&self) -> Result<Vec<i32>> {
        self.show_repo().find_refreshable_ids().await
    }

    pub async fn record_show_refresh(&self, id: i32, details: &ShowDetails) -> Result<()> {
        self.show_repo().record_refresh(id, details).await
    }

    pub async fn upcoming_shows(&self, today: &str) -> Result<Vec<UpcomingRelease>> {
        self.show_repo().upcoming(today).await
    }

    // ------------------------------------------------------------------
    // Dismissed / wishlist
    // ------------------------------------------------------------------

    pub async fn add_dismissed(
        &self,
        title: &str,
        media_type: MediaType,
        reason: Option<&str>,
    ) -> Result<bool> {
        self.dismissed_repo().add(title, media_type, reason).await
    }

    pub async fn list_dismissed(&self) -> Result<Vec<DismissedItem>> {
        self.dismissed_repo().list().await
    }

    pub async fn remove_dismissed(&self, id: i32) -> Result<bool> {
        self.dismissed_repo().remove(id).await
    }

    pub async fn dismissed_titles(&self) -> Result<Vec<String>> {
        self.dismissed_repo().titles().await
    }

    pub async fn add_wishlist_item(
        &self,
        title: &str,
        media_type: MediaType,
        notes: Option<&str>,
    ) -> Result<bool> {
        self.wishlist_repo().add(title, media_type, notes).await
    }

    pub async fn list_wishlist(&self) -> Result<Vec<WishlistItem>> {
        self.wishlist_repo().list().await
    }

    pub async fn remove_wishlist_item(&self, id: i32) -> Result<bool> {
        self.wishlist_repo().remove(id).await
    }

    pub async fn wishlist_titles(&self) -> Result<Vec<String>> {
        self.wishlist_repo().titles().await
    }

    // ------------------------------------------------------------------
    // Tropes
    // ------------------------------------------------------------------

    pub async fn set_trope(&self, trope: &str, affinity: TropeAffinity) -> Result<()> {
        self.trope_repo().set(trope, affinity).await
    }

    pub async fn list_tropes(&self) -> Result<Vec<TropePreference>> {
        self.trope_repo().list().await
    }

    pub async fn remove_trope(&self, trope: &str) -> Result<bool> {
        self.trope_repo().remove(trope).await
    }

    pub async fn replace_tropes(&self, entries: &[(String, TropeAffinity)]) -> Result<()> {
        self.trope_repo().replace_all(entries).await
    }

    // ------------------------------------------------------------------
    // Reviews / goals / stats
    // ------------------------------------------------------------------

    pub async fn save_review(
        &self,
        media_type: MediaType,
        media_id: &str,
        title: &str,
        rating: i32,
        body: Option<&str>,
    ) -> Result<()> {
        self.review_repo()
            .upsert(media_type, media_id, title, rating, body)
            .await
    }

    pub async fn list_reviews(&self) -> Result<Vec<Review>> {
        self.review_repo().list().await
    }

    pub async fn remove_review(&self, id: i32) -> Result<bool> {
        self.review_repo().remove(id).await
    }

    pub async fn set_goal(&self, year: i32, media_type: MediaType, target: i32) -> Result<()> {
        self.goal_repo().set(year, media_type, target).await
    }

    pub async fn list_goals(&self, year: Option<i32>) -> Result<Vec<GoalProgress>> {
        self.goal_repo().list_with_progress(year).await
    }

    pub async fn remove_goal(&self, id: i32) -> Result<bool> {
        self.goal_repo().remove(id).await
    }

    pub async fn book_stats(&self) -> Result<MediaStats> {
        self.stats_repo().book_stats().await
    }

    pub async fn movie_stats(&self) -> Result<MediaStats> {
        self.stats_repo().movie_stats().await
    }

    pub async fn show_stats(&self) -> Result<MediaStats> {
        self.stats_repo().show_stats().await
    }
}
