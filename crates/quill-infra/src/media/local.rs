//! Uploaded files on the local filesystem, under a media root directory.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::domain::ImageKind;
use quill_core::ports::{MediaError, MediaFolder, MediaStore};

pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    /// `base_url` is the public prefix the media root is served under, e.g. `/media`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(
        &self,
        folder: MediaFolder,
        kind: ImageKind,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        let dir = self.root.join(folder.as_str());
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), kind.extension());
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        let relative = format!("{}/{}", folder.as_str(), file_name);
        tracing::debug!(path = %relative, size = bytes.len(), "Stored media file");
        Ok(relative)
    }

    async fn remove(&self, relative_path: &str) -> Result<(), MediaError> {
        tokio::fs::remove_file(self.root.join(relative_path)).await?;
        tracing::debug!(path = %relative_path, "Removed media file");
        Ok(())
    }

    fn public_url(&self, relative_path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            relative_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_writes_under_folder() {
        let root = std::env::temp_dir().join(format!("quill-media-{}", Uuid::new_v4()));
        let store = LocalMediaStore::new(&root, "/media");
        let png = b"\x89PNG\r\n\x1a\n rest of file";

        let relative = store
            .store(MediaFolder::PostImages, ImageKind::Png, png)
            .await
            .unwrap();

        assert!(relative.starts_with("post_images/"));
        assert!(relative.ends_with(".png"));
        let written = tokio::fs::read(root.join(&relative)).await.unwrap();
        assert_eq!(written, png);

        store.remove(&relative).await.unwrap();
        assert!(!root.join(&relative).exists());
        assert!(store.remove(&relative).await.is_err());

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[test]
    fn test_public_url_joins_cleanly() {
        let store = LocalMediaStore::new("/srv/media", "/media/");
        assert_eq!(
            store.public_url("avatar_images/a.jpg"),
            "/media/avatar_images/a.jpg"
        );
    }
}
