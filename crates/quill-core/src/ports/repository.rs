use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostImage, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity; `RepoError::NotFound` if it is missing.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, newest publication first.
    async fn list_recent(&self) -> Result<Vec<Post>, RepoError>;

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Insert every post or none of them. Returns the number inserted.
    async fn create_batch(&self, posts: Vec<Post>) -> Result<u64, RepoError>;
}

/// Post image repository.
#[async_trait]
pub trait PostImageRepository: BaseRepository<PostImage, Uuid> {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<PostImage>, RepoError>;
}
