//! Media storage port - where uploaded images end up.

use async_trait::async_trait;

use crate::domain::ImageKind;

/// Folder an uploaded file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFolder {
    PostImages,
    Avatars,
}

impl MediaFolder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PostImages => "post_images",
            Self::Avatars => "avatar_images",
        }
    }
}

/// Stores uploaded files and turns stored paths into public URLs.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist `bytes` and return the path relative to the media root.
    async fn store(
        &self,
        folder: MediaFolder,
        kind: ImageKind,
        bytes: &[u8],
    ) -> Result<String, MediaError>;

    /// Delete a stored file by its relative path.
    async fn remove(&self, relative_path: &str) -> Result<(), MediaError>;

    /// Public URL for a relative media path.
    fn public_url(&self, relative_path: &str) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Failed to write media file: {0}")]
    Io(#[from] std::io::Error),
}
