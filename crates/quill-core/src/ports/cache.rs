use async_trait::async_trait;
use std::time::Duration;

/// Set of keys with per-entry expiry.
///
/// Used to remember revoked access tokens until they would have expired anyway.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Remember `key`; `ttl = None` keeps it until the process exits.
    async fn set(&self, key: &str, ttl: Option<Duration>);

    /// Whether `key` is present and not expired.
    async fn exists(&self, key: &str) -> bool;
}
