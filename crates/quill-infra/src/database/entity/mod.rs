//! SeaORM entities.

pub mod post;
pub mod post_image;
pub mod user;
