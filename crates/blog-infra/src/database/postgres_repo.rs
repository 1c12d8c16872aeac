//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, Select,
    TransactionTrait,
};
use uuid::Uuid;

use blog_core::domain::{Blog, Category, CustomerUser, Page, PageRequest, SortDirection, SortField};
use blog_core::error::RepoError;
use blog_core::ports::{BlogRepository, CategoryRepository, UserRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as BlogEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL blog post repository.
pub type PostgresBlogRepository = PostgresBaseRepository<BlogEntity>;

/// Escape LIKE metacharacters so the term is matched literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn newest_first(query: Select<BlogEntity>) -> Select<BlogEntity> {
    query
        .order_by_desc(post::Column::CreatedAt)
        .order_by_asc(post::Column::Id)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<CustomerUser>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let result = UserEntity::update_many()
            .col_expr(user::Column::DeletedAt, Expr::value(Some(now)))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn find_page(&self, request: &PageRequest) -> Result<Page<Blog>, RepoError> {
        let column = match request.sort {
            SortField::CreatedAt => post::Column::CreatedAt,
            SortField::UpdatedAt => post::Column::UpdatedAt,
            SortField::Title => post::Column::Title,
        };
        let order = match request.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        let paginator = BlogEntity::find()
            .order_by(column, order)
            .order_by_asc(post::Column::Id)
            .paginate(&self.db, request.size);

        let total_items = paginator.num_items().await.map_err(map_db_err)?;
        // Paginator computes the offset unchecked; such a page is past the end anyway.
        if !PageRequest::offset_fits(request.page, request.size) {
            return Ok(Page {
                items: Vec::new(),
                total_items,
            });
        }
        let items = paginator
            .fetch_page(request.page)
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: items.into_iter().map(Into::into).collect(),
            total_items,
        })
    }

    async fn search(&self, term: &str) -> Result<Vec<Blog>, RepoError> {
        let pattern = like_pattern(term);
        let matches = |column: post::Column| {
            Expr::expr(Func::lower(Expr::col(column)))
                .like(LikeExpr::new(pattern.clone()).escape('\\'))
        };

        let result = newest_first(BlogEntity::find().filter(
            Condition::any()
                .add(matches(post::Column::Title))
                .add(matches(post::Column::Content)),
        ))
        .all(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Blog>, RepoError> {
        let result = newest_first(BlogEntity::find().filter(post::Column::UserId.eq(user_id)))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_category_id(&self, category_id: Uuid) -> Result<Vec<Blog>, RepoError> {
        let result =
            newest_first(BlogEntity::find().filter(post::Column::CategoryId.eq(category_id)))
                .all(&self.db)
                .await
                .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_owned(&self, owner_id: Uuid, blog: &Blog) -> Result<Option<Blog>, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let updated_at: sea_orm::prelude::DateTimeWithTimeZone = blog.updated_at.into();
        let result = BlogEntity::update_many()
            .col_expr(post::Column::Title, Expr::value(blog.title.clone()))
            .col_expr(post::Column::Content, Expr::value(blog.content.clone()))
            .col_expr(post::Column::UpdatedAt, Expr::value(updated_at))
            .filter(post::Column::Id.eq(blog.id))
            .filter(post::Column::UserId.eq(owner_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(map_db_err)?;
            return Ok(None);
        }

        let stored = BlogEntity::find_by_id(blog.id)
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(stored.map(Into::into))
    }

    async fn delete_owned(&self, owner_id: Uuid, blog_id: Uuid) -> Result<bool, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let result = BlogEntity::delete_many()
            .filter(post::Column::Id.eq(blog_id))
            .filter(post::Column::UserId.eq(owner_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(%blog_id, rows = result.rows_affected, "Owned delete executed");
        Ok(result.rows_affected > 0)
    }

    async fn set_featured_image(
        &self,
        blog_id: Uuid,
        image_name: &str,
    ) -> Result<Option<Blog>, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let result = BlogEntity::update_many()
            .col_expr(
                post::Column::FeaturedImage,
                Expr::value(Some(image_name.to_string())),
            )
            .col_expr(post::Column::UpdatedAt, Expr::value(now))
            .filter(post::Column::Id.eq(blog_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(map_db_err)?;
            return Ok(None);
        }

        let stored = BlogEntity::find_by_id(blog_id)
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(stored.map(Into::into))
    }
}
