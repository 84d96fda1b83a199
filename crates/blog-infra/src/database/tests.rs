use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult, RuntimeErr, Value,
};

use blog_core::domain::{CategoryDraft, PostDraft};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CategoryRepository, PostRepository};

use crate::database::entity::{category, post, user};
use crate::database::postgres_base::{query_error, write_error};
use crate::database::postgres_repo::{PostgresCategoryRepository, PostgresPostRepository};

fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

fn category_row(id: i64, parent_id: Option<i64>, title: &str) -> category::Model {
    category::Model {
        id,
        parent_id,
        title: title.to_owned(),
        slug: title.to_lowercase(),
        created_at: now(),
        updated_at: now(),
        deleted_at: None,
    }
}

fn post_row(id: i64, user_id: i64) -> post::Model {
    post::Model {
        id,
        category_id: 1,
        user_id,
        title: "Hello".to_owned(),
        slug: "hello".to_owned(),
        excerpt: "hello".to_owned(),
        content_raw: "<p>hello</p>".to_owned(),
        content_html: "<p>hello</p>".to_owned(),
        is_published: true,
        published_at: Some(now()),
        created_at: now(),
        updated_at: now(),
        deleted_at: None,
    }
}

fn author_row(id: i64) -> user::Model {
    user::Model {
        id,
        name: "Unknown author".to_owned(),
        email: "unknown@blog.local".to_owned(),
        password_hash: String::new(),
        created_at: now(),
        updated_at: now(),
    }
}

fn draft(title: &str) -> PostDraft {
    PostDraft {
        title: title.to_owned(),
        slug: title.to_lowercase().replace(' ', "-"),
        excerpt: "hello".to_owned(),
        content_raw: "<p>hello</p>".to_owned(),
        content_html: "<p>hello</p>".to_owned(),
        category_id: 1,
        is_published: None,
        published_at: None,
    }
}

/// SQL of every statement the connection executed, in order.
fn executed_sql(db: DatabaseConnection) -> Vec<String> {
    db.into_transaction_log()
        .into_iter()
        .flat_map(|txn| txn.statements().to_vec())
        .map(|stmt| stmt.sql)
        .collect()
}

/// The `SET` part of the first `UPDATE`, without its `WHERE`/`RETURNING` tail.
fn update_assignments(sql: &[String]) -> String {
    let update = sql
        .iter()
        .find(|s| s.starts_with("UPDATE"))
        .expect("an UPDATE statement");
    update.split(" WHERE ").next().unwrap_or_default().to_owned()
}

#[tokio::test]
async fn test_find_category_attaches_parent() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![category_row(2, Some(1), "Rust")]])
        .append_query_results([vec![category_row(1, None, "Tech")]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let found = repo.find_by_id(2).await.unwrap().unwrap();

    assert_eq!(found.category.title, "Rust");
    let parent = found.parent_category.unwrap();
    assert_eq!((parent.id, parent.title.as_str()), (1, "Tech"));
}

#[tokio::test]
async fn test_find_category_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<category::Model>::new(), Vec::new()])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    assert!(repo.find_by_id(99).await.unwrap().is_none());
    assert!(!repo.exists(99).await.unwrap());
}

#[tokio::test]
async fn test_list_posts_attaches_author_and_category() {
    let mut row = post_row(5, 1);
    row.is_published = false;
    row.published_at = None;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .append_query_results([vec![category_row(1, None, "Tech")]])
        .append_query_results([vec![author_row(1)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let posts = repo.list().await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post.slug, "hello");
    assert_eq!(posts[0].user.as_ref().map(|u| u.name.as_str()), Some("Unknown author"));
    assert_eq!(posts[0].category.as_ref().map(|c| c.id), Some(1));
}

#[tokio::test]
async fn test_soft_delete_marks_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.delete(5).await.is_ok());

    let sql = executed_sql(repo.db);
    assert_eq!(sql.len(), 1);
    assert!(sql[0].starts_with(r#"UPDATE "blog_posts" SET "deleted_at""#));
    assert!(sql[0].contains(r#""deleted_at" IS NULL"#));
    assert!(!sql[0].contains("DELETE"));
}

#[tokio::test]
async fn test_soft_delete_missing_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    assert!(matches!(repo.delete(404).await, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_create_category_returns_parent() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![category_row(2, Some(1), "Rust")]])
        .append_query_results([vec![category_row(1, None, "Tech")]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let created = repo
        .create(CategoryDraft::new("Rust".to_owned(), None, Some(1)))
        .await
        .unwrap();

    assert_eq!(created.category.id, 2);
    assert_eq!(created.parent_category.map(|p| p.id), Some(1));

    let sql = executed_sql(repo.db);
    assert!(sql[0].starts_with(r#"INSERT INTO "blog_categories""#));
}

#[tokio::test]
async fn test_update_category_rewrites_slug() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![category_row(3, None, "Tech")]])
        .append_query_results([vec![category_row(3, None, "News")]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let updated = repo
        .update(3, CategoryDraft::new("News".to_owned(), None, None))
        .await
        .unwrap();

    assert_eq!(updated.category.slug, "news");
    assert!(updated.parent_category.is_none());

    let assignments = update_assignments(&executed_sql(repo.db));
    assert!(assignments.contains(r#""slug""#));
    assert!(assignments.contains(r#""parent_id""#));
}

#[tokio::test]
async fn test_update_missing_category() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let result = repo
        .update(9, CategoryDraft::new("Ghost".to_owned(), None, None))
        .await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_create_post_records_author_and_default_flags() {
    let mut inserted = post_row(8, 7);
    inserted.is_published = false;
    inserted.published_at = None;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![inserted]])
        .append_query_results([vec![category_row(1, None, "Tech")]])
        .append_query_results([vec![author_row(7)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let created = repo.create(draft("Hello"), 7).await.unwrap();

    assert_eq!(created.post.user_id, 7);
    assert_eq!(created.user.map(|u| u.id), Some(7));

    let log = repo.db.into_transaction_log();
    let insert = log[0].statements()[0].clone();
    assert!(insert.sql.starts_with(r#"INSERT INTO "blog_posts""#));

    let values = insert.values.unwrap().0;
    assert!(values.contains(&Value::BigInt(Some(7))));
    assert!(values.contains(&Value::Bool(Some(false))));
}

#[tokio::test]
async fn test_update_post_leaves_absent_flags_and_author() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_row(5, 1)]])
        .append_query_results([vec![post_row(5, 1)]])
        .append_query_results([vec![category_row(1, None, "Tech")]])
        .append_query_results([vec![author_row(1)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let updated = repo.update(5, draft("Hello again")).await.unwrap();
    assert_eq!(updated.post.user_id, 1);

    let assignments = update_assignments(&executed_sql(repo.db));
    assert!(assignments.contains(r#""title""#));
    assert!(assignments.contains(r#""content_html""#));
    assert!(!assignments.contains(r#""is_published""#));
    assert!(!assignments.contains(r#""published_at""#));
    assert!(!assignments.contains(r#""user_id""#));
}

#[tokio::test]
async fn test_update_post_null_clears_published_at() {
    let mut cleared = post_row(5, 1);
    cleared.is_published = false;
    cleared.published_at = None;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_row(5, 1)]])
        .append_query_results([vec![cleared]])
        .append_query_results([vec![category_row(1, None, "Tech")]])
        .append_query_results([vec![author_row(1)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let updated = repo
        .update(
            5,
            PostDraft {
                is_published: Some(false),
                published_at: Some(None),
                ..draft("Hello")
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.post.published_at, None);

    let assignments = update_assignments(&executed_sql(repo.db));
    assert!(assignments.contains(r#""is_published""#));
    assert!(assignments.contains(r#""published_at""#));
    assert!(!assignments.contains(r#""user_id""#));
}

#[test]
fn test_connection_failures_are_reported_apart() {
    let refused = DbErr::Conn(RuntimeErr::Internal("connection refused".to_owned()));
    assert!(matches!(query_error(refused), RepoError::Connection(_)));

    let refused = DbErr::Conn(RuntimeErr::Internal("connection refused".to_owned()));
    assert!(matches!(write_error(refused), RepoError::Connection(_)));

    let bad = DbErr::Custom("syntax error".to_owned());
    assert!(matches!(query_error(bad), RepoError::Query(_)));

    let dup = DbErr::Custom("duplicate key value violates unique constraint".to_owned());
    assert!(matches!(write_error(dup), RepoError::Constraint(_)));
}
