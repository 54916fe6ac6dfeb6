//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod media;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use cache::Cache;
pub use media::{MediaError, MediaFolder, MediaStore};
pub use repository::{BaseRepository, PostImageRepository, PostRepository, UserRepository};
