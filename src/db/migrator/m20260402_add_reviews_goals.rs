use crate::entities::prelude::{Goals, Reviews};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Reviews)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Goals)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_media")
                    .table(ReviewsTable::Table)
                    .col(ReviewsTable::MediaType)
                    .col(ReviewsTable::MediaId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_goals_year_type")
                    .table(GoalsTable::Table)
                    .col(GoalsTable::Year)
                    .col(GoalsTable::MediaType)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Goals).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reviews).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ReviewsTable {
    #[sea_orm(iden = "reviews")]
    Table,
    MediaType,
    MediaId,
}

#[derive(DeriveIden)]
enum GoalsTable {
    #[sea_orm(iden = "goals")]
    Table,
    Year,
    MediaType,
}
