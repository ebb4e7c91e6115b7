//! Create user_code table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserCode::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserCode::Email)
                            .string_len(256)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserCode::ConfirmationCode)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserCode::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserCode::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserCode {
    Table,
    Email,
    ConfirmationCode,
    Created,
}
