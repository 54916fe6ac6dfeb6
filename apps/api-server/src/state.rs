//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::PostImporter;
use quill_core::ports::{
    Cache, MediaStore, PasswordService, PostImageRepository, PostRepository, TokenService,
    UserRepository,
};
use quill_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryPostImageRepository, InMemoryPostRepository,
    InMemoryUserRepository, JwtTokenService, LocalMediaStore,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub images: Arc<dyn PostImageRepository>,
    pub importer: Arc<PostImporter>,
    pub media: Arc<dyn MediaStore>,
    pub cache: Arc<dyn Cache>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

/// The three repositories, backed by the same store.
struct Repositories {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    images: Arc<dyn PostImageRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            images: Arc::new(InMemoryPostImageRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &AppConfig) -> Option<Self> {
        use migration::{Migrator, MigratorTrait};
        use quill_infra::database::{
            PostgresPostImageRepository, PostgresPostRepository, PostgresUserRepository, connect,
        };

        let db_config = config.database.as_ref()?;
        let conn = match connect(db_config).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
                return None;
            }
        };

        if config.run_migrations {
            if let Err(e) = Migrator::up(&conn, None).await {
                tracing::error!(error = %e, "Failed to apply migrations. Using in-memory fallback.");
                return None;
            }
            tracing::info!("Database migrations applied");
        }

        Some(Self {
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            images: Arc::new(PostgresPostImageRepository::new(conn)),
        })
    }
}

impl AppState {
    /// Build the application state, on PostgreSQL when it is configured and reachable.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let repos = match Repositories::postgres(config).await {
            Some(repos) => repos,
            None => {
                if config.database.is_none() {
                    tracing::warn!(
                        "DATABASE_URL not set. Running without database (in-memory mode)."
                    );
                }
                Repositories::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Repositories::in_memory()
        };

        let state = Self::assemble(config, repos);
        tracing::info!("Application state initialized");
        state
    }

    /// State on in-memory repositories only.
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::assemble(config, Repositories::in_memory())
    }

    fn assemble(config: &AppConfig, repos: Repositories) -> Self {
        let importer = PostImporter::new(config.import, repos.posts.clone());

        Self {
            users: repos.users,
            posts: repos.posts,
            images: repos.images,
            importer: Arc::new(importer),
            media: Arc::new(LocalMediaStore::new(
                config.media_root.clone(),
                config.media_url.clone(),
            )),
            cache: Arc::new(InMemoryCache::new()),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }
}
