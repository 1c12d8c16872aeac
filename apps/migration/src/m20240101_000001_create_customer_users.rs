use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CustomerUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerUsers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CustomerUsers::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(CustomerUsers::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CustomerUsers::PasswordHash).string().not_null())
                    .col(ColumnDef::new(CustomerUsers::Intro).string_len(300).not_null())
                    .col(
                        ColumnDef::new(CustomerUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CustomerUsers::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerUsers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum CustomerUsers {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Intro,
    CreatedAt,
    DeletedAt,
}
