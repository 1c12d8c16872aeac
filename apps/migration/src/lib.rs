//! Schema migrations, applied in order by the `migration` binary or at
//! server startup when `RUN_MIGRATIONS=true`.

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_customer_users;
mod m20240101_000002_create_blog_categories;
mod m20240101_000003_create_blogs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_customer_users::Migration),
            Box::new(m20240101_000002_create_blog_categories::Migration),
            Box::new(m20240101_000003_create_blogs::Migration),
        ]
    }
}
