use crate::domain::MediaType;
use crate::entities::{dismissed_media, prelude::*, wishlist};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

/// Dismissed titles: things the user never wants recommended again.
/// Keyed by `(title, media_type)`, not provider id.
pub struct DismissedRepository {
    conn: DatabaseConnection,
}

impl DismissedRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns false when the title was already dismissed.
    pub async fn add(
        &self,
        title: &str,
        media_type: MediaType,
        reason: Option<&str>,
    ) -> anyhow::Result<bool> {
        let model = dismissed_media::ActiveModel {
            title: Set(title.to_string()),
            media_type: Set(media_type.as_str().to_string()),
            reason: Set(reason.map(ToString::to_string)),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };
        let inserted = match DismissedMedia::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    dismissed_media::Column::Title,
                    dismissed_media::Column::MediaType,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&self.conn)
            .await
        {
            Ok(_) => true,
            Err(sea_orm::DbErr::RecordNotInserted) => false,
            Err(e) => return Err(e.into()),
        };

        if inserted {
            info!("Dismissed {}: {}", media_type, title);
        }
        Ok(inserted)
    }

    pub async fn list(&self) -> anyhow::Result<Vec<dismissed_media::Model>> {
        let rows = DismissedMedia::find()
            .order_by_desc(dismissed_media::Column::CreatedAt)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn remove(&self, id: i32) -> anyhow::Result<bool> {
        let result = DismissedMedia::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn titles(&self) -> anyhow::Result<Vec<String>> {
        let titles = DismissedMedia::find()
            .select_only()
            .column(dismissed_media::Column::Title)
            .order_by_asc(dismissed_media::Column::Id)
            .into_tuple()
            .all(&self.conn)
            .await?;
        Ok(titles)
    }
}

/// Wishlist titles: things the user already intends to get to. Excluded from
/// recommendations for the opposite reason dismissals are.
pub struct WishlistRepository {
    conn: DatabaseConnection,
}

impl WishlistRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns false when the title was already wishlisted.
    pub async fn add(
        &self,
        title: &str,
        media_type: MediaType,
        notes: Option<&str>,
    ) -> anyhow::Result<bool> {
        let model = wishlist::ActiveModel {
            title: Set(title.to_string()),
            media_type: Set(media_type.as_str().to_string()),
            notes: Set(notes.map(ToString::to_string)),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };
        let inserted = match Wishlist::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    wishlist::Column::Title,
                    wishlist::Column::MediaType,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&self.conn)
            .await
        {
            Ok(_) => true,
            Err(sea_orm::DbErr::RecordNotInserted) => false,
            Err(e) => return Err(e.into()),
        };

        if inserted {
            info!("Wishlisted {}: {}", media_type, title);
        }
        Ok(inserted)
    }

    pub async fn list(&self) -> anyhow::Result<Vec<wishlist::Model>> {
        let rows = Wishlist::find()
            .order_by_desc(wishlist::Column::CreatedAt)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn remove(&self, id: i32) -> anyhow::Result<bool> {
        let result = Wishlist::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn titles(&self) -> anyhow::Result<Vec<String>> {
        let titles = Wishlist::find()
            .select_only()
            .column(wishlist::Column::Title)
            .order_by_asc(wishlist::Column::Id)
            .into_tuple()
            .all(&self.conn)
            .await?;
        Ok(titles)
    }
}
