use crate::entities::prelude::*;
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
                    .create_table_from_entity(Books)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Movies)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Shows)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserBooks)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserMovies)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserShows)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(DismissedMedia)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Wishlist)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(TropePreferences)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dismissed_media_title_type")
                    .table(DismissedTable::Table)
                    .col(DismissedTable::Title)
                    .col(DismissedTable::MediaType)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_wishlist_title_type")
                    .table(WishlistTable::Table)
                    .col(WishlistTable::Title)
                    .col(WishlistTable::MediaType)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TropePreferences).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wishlist).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DismissedMedia).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserShows).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserMovies).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserBooks).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shows).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movies).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Books).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum DismissedTable {
    #[sea_orm(iden = "dismissed_media")]
    Table,
    Title,
    MediaType,
}

#[derive(DeriveIden)]
enum WishlistTable {
    #[sea_orm(iden = "wishlist")]
    Table,
    Title,
    MediaType,
}
