use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Titles::Table)
                    .if_not_exists()
                    .col(pk_auto(Titles::Id))
                    .col(string(Titles::Title))
                    .col(integer(Titles::Duration))
                    .col(string_null(Titles::DateAdded))
                    .col(integer(Titles::ReleaseYear))
                    .col(integer(Titles::ContentAge))
                    .col(text(Titles::Fields))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_titles_release_year")
                    .table(Titles::Table)
                    .col(Titles::ReleaseYear)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Titles::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Titles {
    Table,
    Id,
    Title,
    Duration,
    DateAdded,
    ReleaseYear,
    ContentAge,
    Fields,
}
