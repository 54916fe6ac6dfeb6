use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{
    POSTS_PER_INSERT, PostgresPostRepository, PostgresUserRepository,
};

fn post_model(id: Uuid, author_id: Uuid, title: &str) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id,
        title: title.to_owned(),
        content: "Content".to_owned(),
        published_at: now.into(),
        created_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, Uuid::new_v4(), "Test Post")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = post.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
}

#[tokio::test]
async fn test_list_recent_maps_rows() {
    let author = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            post_model(Uuid::new_v4(), author, "newer"),
            post_model(Uuid::new_v4(), author, "older"),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts = repo.list_recent().await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title, "newer");
}

#[tokio::test]
async fn test_create_batch_reports_inserted_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        }])
        .into_connection();
    let repo = PostgresPostRepository::new(db);
    let author = Uuid::new_v4();

    let count = repo
        .create_batch(vec![
            Post::new(author, "A".into(), "a".into()),
            Post::new(author, "B".into(), "b".into()),
        ])
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_large_batch_is_inserted_in_chunks() {
    let total = 2 * POSTS_PER_INSERT + 1;
    // one exec result per INSERT: a single oversized statement would consume
    // only the first, and a fourth statement would find none
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: POSTS_PER_INSERT as u64,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: POSTS_PER_INSERT as u64,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .into_connection();
    let repo = PostgresPostRepository::new(db);
    let author = Uuid::new_v4();

    let posts = (0..total)
        .map(|i| Post::new(author, format!("Post {i}"), "body".into()))
        .collect();
    let count = repo.create_batch(posts).await.unwrap();

    assert_eq!(count, total as u64);
}

#[tokio::test]
async fn test_create_batch_failure_is_reported() {
    // no exec result queued: the insert fails inside the transaction
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);

    let result = repo
        .create_batch(vec![Post::new(Uuid::new_v4(), "A".into(), "a".into())])
        .await;

    assert!(matches!(
        result,
        Err(RepoError::Query(_) | RepoError::Transaction(_))
    ));
}

#[tokio::test]
async fn test_empty_batch_skips_the_database() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);

    assert_eq!(repo.create_batch(Vec::new()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_find_user_by_username() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user::Model {
            id: Uuid::new_v4(),
            username: "writer".to_owned(),
            email: None,
            first_name: String::new(),
            last_name: String::new(),
            password_hash: "hash".to_owned(),
            avatar_path: Some("avatar_images/a.png".to_owned()),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user = repo.find_by_username("writer").await.unwrap().unwrap();

    assert_eq!(user.username, "writer");
    assert_eq!(user.avatar_path.as_deref(), Some("avatar_images/a.png"));
}
