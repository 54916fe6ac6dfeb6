//! Domain entities - the core business objects.

mod image;
mod post;
mod user;

pub use image::{ImageKind, PostImage};
pub use post::{Post, SHORT_CONTENT_LENGTH};
pub use user::User;
