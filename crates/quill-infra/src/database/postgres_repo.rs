//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use uuid::Uuid;

use quill_core::domain::{Post, PostImage, User};
use quill_core::error::RepoError;
use quill_core::ports::{PostImageRepository, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_image::{self, Entity as PostImageEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// Rows per `INSERT` of a post batch. Each row binds 6 parameters and
/// PostgreSQL caps a statement at 65535.
pub(crate) const POSTS_PER_INSERT: usize = 1000;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL post image repository.
pub type PostgresPostImageRepository = PostgresBaseRepository<PostImageEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_recent(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create_batch(&self, posts: Vec<Post>) -> Result<u64, RepoError> {
        if posts.is_empty() {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        // dropping `txn` on the error path rolls the whole batch back
        let mut inserted = 0;
        for chunk in posts.chunks(POSTS_PER_INSERT) {
            inserted += PostEntity::insert_many(chunk.iter().cloned().map(post::ActiveModel::from))
                .exec_without_returning(&txn)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        tracing::debug!(inserted, "Post batch committed");
        Ok(inserted)
    }
}

#[async_trait]
impl PostImageRepository for PostgresPostImageRepository {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<PostImage>, RepoError> {
        let result = PostImageEntity::find()
            .filter(post_image::Column::PostId.eq(post_id))
            .order_by_asc(post_image::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
