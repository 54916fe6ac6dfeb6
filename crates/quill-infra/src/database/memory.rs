//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, PostImage, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostImageRepository, PostRepository, UserRepository};

/// Entities stored in an [`InMemoryRepository`].
pub trait Keyed {
    fn key(&self) -> Uuid;

    /// Unique-column clash with another row, beyond the key itself.
    fn conflicts_with(&self, _other: &Self) -> bool {
        false
    }
}

impl Keyed for User {
    fn key(&self) -> Uuid {
        self.id
    }

    fn conflicts_with(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

impl Keyed for Post {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for PostImage {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// A table of entities keyed by id.
pub struct InMemoryRepository<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub type InMemoryUserRepository = InMemoryRepository<User>;
pub type InMemoryPostRepository = InMemoryRepository<Post>;
pub type InMemoryPostImageRepository = InMemoryRepository<PostImage>;

#[async_trait]
impl<T> BaseRepository<T, Uuid> for InMemoryRepository<T>
where
    T: Keyed + Clone + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn create(&self, entity: T) -> Result<T, RepoError> {
        // checked and inserted under one write guard
        let mut rows = self.rows.write().await;
        if rows.contains_key(&entity.key()) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        if rows.values().any(|row| row.conflicts_with(&entity)) {
            return Err(RepoError::Constraint("Unique value already taken".to_string()));
        }
        rows.insert(entity.key(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        let clash = rows
            .values()
            .any(|row| row.key() != entity.key() && row.conflicts_with(&entity));
        if clash {
            return Err(RepoError::Constraint("Unique value already taken".to_string()));
        }
        match rows.get_mut(&entity.key()) {
            Some(row) => {
                *row = entity.clone();
                Ok(entity)
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|u| u.username == username).cloned())
    }
}

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    posts
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_recent(&self) -> Result<Vec<Post>, RepoError> {
        let rows = self.rows.read().await;
        Ok(newest_first(rows.values().cloned().collect()))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let rows = self.rows.read().await;
        Ok(newest_first(
            rows.values()
                .filter(|p| p.author_id == author_id)
                .cloned()
                .collect(),
        ))
    }

    async fn create_batch(&self, posts: Vec<Post>) -> Result<u64, RepoError> {
        // one write guard for the whole batch: readers see all posts or none
        let mut rows = self.rows.write().await;
        if let Some(dup) = posts.iter().find(|p| rows.contains_key(&p.id)) {
            return Err(RepoError::Constraint(format!("Post {} already exists", dup.id)));
        }

        let count = posts.len() as u64;
        rows.extend(posts.into_iter().map(|p| (p.id, p)));
        Ok(count)
    }
}

#[async_trait]
impl PostImageRepository for InMemoryPostImageRepository {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<PostImage>, RepoError> {
        let rows = self.rows.read().await;
        let mut images: Vec<_> = rows
            .values()
            .filter(|i| i.post_id == post_id)
            .cloned()
            .collect();
        images.sort_by_key(|i| i.created_at);
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post_at(author: Uuid, title: &str, year: i32) -> Post {
        let at = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap();
        Post::published_at(author, title.to_string(), "content".to_string(), at)
    }

    #[tokio::test]
    async fn test_list_recent_orders_by_publication_desc() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        for (title, year) in [("middle", 2015), ("old", 2011), ("new", 2021)] {
            repo.create(post_at(author, title, year)).await.unwrap();
        }

        let titles: Vec<_> = repo
            .list_recent()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["new", "middle", "old"]);
    }

    #[tokio::test]
    async fn test_create_batch_is_all_or_nothing() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let existing = repo.create(post_at(author, "existing", 2020)).await.unwrap();

        let batch = vec![post_at(author, "fresh", 2021), existing.clone()];
        let result = repo.create_batch(batch).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
        assert_eq!(repo.list_recent().await.unwrap().len(), 1);

        let count = repo
            .create_batch(vec![post_at(author, "a", 2001), post_at(author, "b", 2002)])
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(repo.find_by_author(author).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("ghost".to_string(), "hash".to_string());
        assert!(matches!(repo.update(user).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("writer".to_string(), "hash".to_string()))
            .await
            .unwrap();

        assert!(repo.find_by_username("writer").await.unwrap().is_some());
        assert!(repo.find_by_username("reader").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_constraint_violation() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("writer".to_string(), "hash".to_string()))
            .await
            .unwrap();

        let second = repo
            .create(User::new("writer".to_string(), "other".to_string()))
            .await;
        assert!(matches!(second, Err(RepoError::Constraint(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_registrations_keep_one_username() {
        let repo = std::sync::Arc::new(InMemoryUserRepository::new());

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(User::new("writer".to_string(), "hash".to_string()))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_images_by_post() {
        let repo = InMemoryPostImageRepository::new();
        let post_id = Uuid::new_v4();
        repo.create(PostImage::new(post_id, "post_images/a.png".into()))
            .await
            .unwrap();
        repo.create(PostImage::new(Uuid::new_v4(), "post_images/b.png".into()))
            .await
            .unwrap();

        let images = repo.find_by_post_id(post_id).await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].file_path, "post_images/a.png");
    }
}
