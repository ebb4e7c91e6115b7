//! Create title and title_genre tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Title::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Title::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Title::Name).text().not_null())
                    .col(ColumnDef::new(Title::Year).integer().not_null())
                    .col(ColumnDef::new(Title::Description).text())
                    .col(ColumnDef::new(Title::CategoryId).string_len(32))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_title_category")
                            .from(Title::Table, Title::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: year (exact-match filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_title_year")
                    .table(Title::Table)
                    .col(Title::Year)
                    .to_owned(),
            )
            .await?;

        // Index: category_id (slug filter joins through category)
        manager
            .create_index(
                Index::create()
                    .name("idx_title_category_id")
                    .table(Title::Table)
                    .col(Title::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TitleGenre::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TitleGenre::TitleId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TitleGenre::GenreId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(TitleGenre::TitleId)
                            .col(TitleGenre::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_title_genre_title")
                            .from(TitleGenre::Table, TitleGenre::TitleId)
                            .to(Title::Table, Title::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_title_genre_genre")
                            .from(TitleGenre::Table, TitleGenre::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: genre_id (genre slug filter joins through here)
        manager
            .create_index(
                Index::create()
                    .name("idx_title_genre_genre_id")
                    .table(TitleGenre::Table)
                    .col(TitleGenre::GenreId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TitleGenre::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Title::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Title {
    Table,
    Id,
    Name,
    Year,
    Description,
    CategoryId,
}

#[derive(Iden)]
enum TitleGenre {
    Table,
    TitleId,
    GenreId,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}

#[derive(Iden)]
enum Genre {
    Table,
    Id,
}
