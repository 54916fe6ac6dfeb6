use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of content characters shown for a post in the post list.
pub const SHORT_CONTENT_LENGTH: usize = 100;

/// Post entity - a blog post written by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a post published right now.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        Self::published_at(author_id, title, content, Utc::now())
    }

    /// Create a post with an explicit publication time.
    pub fn published_at(
        author_id: Uuid,
        title: String,
        content: String,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            published_at,
            created_at: Utc::now(),
        }
    }

    /// Content cut to [`SHORT_CONTENT_LENGTH`] characters, with `...` appended
    /// when something was cut.
    pub fn short_content(&self) -> String {
        match self.content.char_indices().nth(SHORT_CONTENT_LENGTH) {
            Some((cut, _)) => format!("{}...", &self.content[..cut]),
            None => self.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_keeps_short_posts() {
        let post = Post::new(Uuid::new_v4(), "t".into(), "short".into());
        assert_eq!(post.short_content(), "short");
    }

    #[test]
    fn test_short_content_exactly_at_limit() {
        let content = "a".repeat(SHORT_CONTENT_LENGTH);
        let post = Post::new(Uuid::new_v4(), "t".into(), content.clone());
        assert_eq!(post.short_content(), content);
    }

    #[test]
    fn test_short_content_cuts_on_characters() {
        let content = "ж".repeat(SHORT_CONTENT_LENGTH + 5);
        let post = Post::new(Uuid::new_v4(), "t".into(), content);

        let short = post.short_content();
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), SHORT_CONTENT_LENGTH + 3);
    }
}
