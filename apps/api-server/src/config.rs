//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use quill_core::ImportConfig;
use quill_core::import::{DEFAULT_DELIMITER, MAX_TITLE_LENGTH};
use quill_infra::JwtConfig;
use quill_infra::auth::DEV_SECRET;
use quill_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations on startup.
    pub run_migrations: bool,
    pub import: ImportConfig,
    pub media_root: PathBuf,
    pub media_url: String,
    /// Largest accepted request body: posts files and images.
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("POSTS_FILE_DELIMITER must be a single character other than '\"' or a line break, got {0:?}")]
    InvalidDelimiter(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            run_migrations: true,
            import: ImportConfig::default(),
            media_root: PathBuf::from("./media"),
            media_url: "/media".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            jwt: JwtConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            config.max_connections = parse_or("DB_MAX_CONNECTIONS", config.max_connections);
            config.min_connections = parse_or("DB_MIN_CONNECTIONS", config.min_connections);
            config
        });

        let delimiter = match env::var("POSTS_FILE_DELIMITER") {
            Ok(raw) => parse_delimiter(&raw)?,
            Err(_) => DEFAULT_DELIMITER,
        };

        let import = ImportConfig {
            delimiter,
            max_title_length: MAX_TITLE_LENGTH,
            max_content_length: parse_or("POST_MAX_LENGTH", defaults.import.max_content_length),
        };

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEV_SECRET.to_string()
            }),
            expiration_hours: parse_or("JWT_EXPIRATION_HOURS", defaults.jwt.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.jwt.issuer),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", defaults.port),
            database,
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.run_migrations),
            import,
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_root),
            media_url: env::var("MEDIA_URL").unwrap_or(defaults.media_url),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            jwt,
        })
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn parse_delimiter(raw: &str) -> Result<char, ConfigError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if ImportConfig::is_valid_delimiter(c) => Ok(c),
        _ => Err(ConfigError::InvalidDelimiter(raw.to_string())),
    }
}
