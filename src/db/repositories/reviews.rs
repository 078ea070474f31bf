use crate::domain::MediaType;
use crate::entities::{prelude::*, reviews};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// One review per `(media_type, media_id)`: re-posting overwrites the
    /// previous text and rating in place.
    pub async fn upsert(
        &self,
        media_type: MediaType,
        media_id: &str,
        title: &str,
        rating: i32,
        body: Option<&str>,
    ) -> anyhow::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let model = reviews::ActiveModel {
            media_type: Set(media_type.as_str().to_string()),
            media_id: Set(media_id.to_string()),
            title: Set(title.to_string()),
            rating: Set(rating),
            body: Set(body.map(ToString::to_string)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        Reviews::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    reviews::Column::MediaType,
                    reviews::Column::MediaId,
                ])
                .update_columns([
                    reviews::Column::Title,
                    reviews::Column::Rating,
                    reviews::Column::Body,
                    reviews::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        info!("Saved review for {} {}", media_type, media_id);
        Ok(())
    }

    pub async fn list(&self) -> anyhow::Result<Vec<reviews::Model>> {
        let rows = Reviews::find()
            .order_by_desc(reviews::Column::UpdatedAt)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn remove(&self, id: i32) -> anyhow::Result<bool> {
        let result = Reviews::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
