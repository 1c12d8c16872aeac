use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_customer_users::CustomerUsers;
use crate::m20240101_000002_create_blog_categories::BlogCategories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Blogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Blogs::UserId).uuid().not_null())
                    .col(ColumnDef::new(Blogs::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Blogs::Title).string_len(150).not_null())
                    .col(ColumnDef::new(Blogs::Content).text().not_null())
                    .col(ColumnDef::new(Blogs::FeaturedImage).string_len(255))
                    .col(
                        ColumnDef::new(Blogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Blogs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blogs_user")
                            .from(Blogs::Table, Blogs::UserId)
                            .to(CustomerUsers::Table, CustomerUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blogs_category")
                            .from(Blogs::Table, Blogs::CategoryId)
                            .to(BlogCategories::Table, BlogCategories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_blogs_user_id", Blogs::UserId),
            ("idx_blogs_category_id", Blogs::CategoryId),
            ("idx_blogs_created_at", Blogs::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Blogs::Table)
                        .col(column)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Blogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Blogs {
    Table,
    Id,
    UserId,
    CategoryId,
    Title,
    Content,
    FeaturedImage,
    CreatedAt,
    UpdatedAt,
}
