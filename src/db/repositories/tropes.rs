use crate::domain::TropeAffinity;
use crate::entities::{prelude::*, trope_preferences};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

pub struct TropeRepository {
    conn: DatabaseConnection,
}

impl TropeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn set(&self, trope: &str, affinity: TropeAffinity) -> anyhow::Result<()> {
        let model = trope_preferences::ActiveModel {
            trope: Set(trope.to_string()),
            affinity: Set(affinity.as_str().to_string()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };
        TropePreferences::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(trope_preferences::Column::Trope)
                    .update_columns([
                        trope_preferences::Column::Affinity,
                        trope_preferences::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn list(&self) -> anyhow::Result<Vec<trope_preferences::Model>> {
        let rows = TropePreferences::find()
            .order_by_asc(trope_preferences::Column::Trope)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn remove(&self, trope: &str) -> anyhow::Result<bool> {
        let result = TropePreferences::delete_many()
            .filter(trope_preferences::Column::Trope.eq(trope))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Replaces the whole preference set in one transaction, so a failure
    /// cannot leave the table half-cleared.
    pub async fn replace_all(&self, entries: &[(String, TropeAffinity)]) -> anyhow::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.conn.begin().await?;

        TropePreferences::delete_many().exec(&txn).await?;

        if !entries.is_empty() {
            let models = entries.iter().map(|(trope, affinity)| {
                trope_preferences::ActiveModel {
                    trope: Set(trope.clone()),
                    affinity: Set(affinity.as_str().to_string()),
                    updated_at: Set(now.clone()),
                }
            });
            TropePreferences::insert_many(models).exec(&txn).await?;
        }

        txn.commit().await?;

        info!("Replaced trope preferences ({} entries)", entries.len());
        Ok(())
    }
}
