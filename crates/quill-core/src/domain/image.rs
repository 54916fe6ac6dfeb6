use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostImage {
    pub id: Uuid,
    pub post_id: Uuid,
    /// Path relative to the media root.
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

impl PostImage {
    pub fn new(post_id: Uuid, file_path: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            file_path,
            created_at: Utc::now(),
        }
    }
}

/// Image formats accepted for uploads, detected from the file signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageKind {
    /// Sniff the format from the leading bytes of a file.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_known_signatures() {
        assert_eq!(ImageKind::detect(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), Some(ImageKind::Jpeg));
        assert_eq!(
            ImageKind::detect(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"),
            Some(ImageKind::Png)
        );
        assert_eq!(ImageKind::detect(b"GIF89a\x01\x00"), Some(ImageKind::Gif));
        assert_eq!(ImageKind::detect(b"RIFF\x24\0\0\0WEBPVP8 "), Some(ImageKind::Webp));
    }

    #[test]
    fn test_detect_rejects_text_and_truncated_headers() {
        assert_eq!(ImageKind::detect(b"Title|Body|12:00:00 01.01.2020"), None);
        assert_eq!(ImageKind::detect(&[0x89, b'P']), None);
        assert_eq!(ImageKind::detect(&[]), None);
    }
}
