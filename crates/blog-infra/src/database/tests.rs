#[cfg(test)]
mod tests {
    use crate::database::entity::{category, post, user};
    use crate::database::postgres_repo::{
        PostgresBlogRepository, PostgresCategoryRepository, PostgresUserRepository,
    };
    use blog_core::domain::{Blog, Category, CustomerUser, PageRequest};
    use blog_core::ports::{BaseRepository, BlogRepository, CategoryRepository, UserRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn post_model(id: uuid::Uuid, user_id: uuid::Uuid) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            user_id,
            category_id: uuid::Uuid::new_v4(),
            title: "Test Post".to_owned(),
            content: "Content".to_owned(),
            featured_image: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_blog_by_id() {
        let blog_id = uuid::Uuid::new_v4();
        let user_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(blog_id, user_id)]])
            .into_connection();

        let repo = PostgresBlogRepository::new(db);

        let result: Option<Blog> = repo.find_by_id(blog_id).await.unwrap();

        let blog = result.expect("blog should be found");
        assert_eq!(blog.title, "Test Post");
        assert_eq!(blog.id, blog_id);
        assert_eq!(blog.user_id, user_id);
    }

    #[tokio::test]
    async fn test_insert_category_returns_stored_row() {
        let category = Category::new("Rust".to_owned());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category::Model {
                id: category.id,
                name: category.name.clone(),
                created_at: category.created_at.into(),
            }]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);
        let stored: Category = repo.insert(category.clone()).await.unwrap();

        assert_eq!(stored.id, category.id);
        assert_eq!(stored.name, "Rust");
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let user = CustomerUser::new(
            "Alice".to_owned(),
            "alice@example.com".to_owned(),
            "hash".to_owned(),
            "Writes about systems".to_owned(),
        );
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
                intro: user.intro.clone(),
                created_at: user.created_at.into(),
                deleted_at: None,
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let found = repo.find_by_email("alice@example.com").await.unwrap();

        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_soft_delete_reports_affected_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let id = uuid::Uuid::new_v4();

        assert!(repo.soft_delete(id).await.unwrap());
        assert!(!repo.soft_delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_owned_not_matching_returns_false() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresBlogRepository::new(db);
        let deleted = repo
            .delete_owned(uuid::Uuid::new_v4(), uuid::Uuid::new_v4())
            .await
            .unwrap();

        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_update_owned_by_stranger_returns_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresBlogRepository::new(db);
        let blog: Blog = post_model(uuid::Uuid::new_v4(), uuid::Uuid::new_v4()).into();

        let result = repo.update_owned(uuid::Uuid::new_v4(), &blog).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_owned_returns_stored_row() {
        let blog_id = uuid::Uuid::new_v4();
        let owner = uuid::Uuid::new_v4();
        let mut model = post_model(blog_id, owner);
        model.title = "Edited".to_owned();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        let repo = PostgresBlogRepository::new(db);
        let blog: Blog = model.into();

        let stored = repo.update_owned(owner, &blog).await.unwrap();
        assert_eq!(stored.map(|b| b.title), Some("Edited".to_owned()));
    }

    #[tokio::test]
    async fn test_find_page_far_past_the_end_skips_fetch() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![std::collections::BTreeMap::from([(
                "num_items",
                sea_orm::Value::from(3i64),
            )])]])
            .into_connection();

        let repo = PostgresBlogRepository::new(db);
        let request = PageRequest {
            page: u64::MAX,
            ..PageRequest::default()
        };

        let page = repo.find_page(&request).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 3);
    }
}
