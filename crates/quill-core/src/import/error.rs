//! Failures of a posts file import.
//!
//! The `Display` text of each variant is the message shown to the uploader.

use thiserror::Error;

use crate::error::RepoError;

/// Which post field broke a length limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Title,
    Content,
}

impl std::fmt::Display for PostField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostField::Title => f.write_str("title"),
            PostField::Content => f.write_str("content"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(
        "No posts have been created. Error reading file: the file must be UTF-8 text \
         with values separated by '{delimiter}'"
    )]
    Decode { delimiter: char },

    #[error(
        "No posts have been created. Line {line} must contain exactly 3 values: \
         title, content, publication date"
    )]
    MalformedLine { line: usize },

    #[error("No posts have been created. Empty post title value in line {line}")]
    EmptyTitle { line: usize },

    #[error("No posts have been created. Empty post content value in line {line}")]
    EmptyContent { line: usize },

    #[error(
        "No posts have been created. Incorrect date value in line {line}, \
         expected hh:mi:ss dd.mm.yyyy"
    )]
    InvalidDate { line: usize },

    #[error("No posts have been created. Post {field} in line {line} exceeds {max} characters")]
    FieldTooLong {
        line: usize,
        field: PostField,
        max: usize,
    },

    /// Storage failed while committing the batch; the cause stays server side.
    #[error("No posts have been created. An unexpected error has occurred")]
    Unexpected(#[source] RepoError),
}

impl ImportError {
    /// Short machine-readable name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::Decode { .. } => "decode",
            ImportError::MalformedLine { .. } => "malformed_line",
            ImportError::EmptyTitle { .. } => "empty_title",
            ImportError::EmptyContent { .. } => "empty_content",
            ImportError::InvalidDate { .. } => "invalid_date",
            ImportError::FieldTooLong { .. } => "field_too_long",
            ImportError::Unexpected(_) => "unexpected",
        }
    }

    /// 1-based number of the offending line, when one line is to blame.
    pub fn line(&self) -> Option<usize> {
        match self {
            ImportError::MalformedLine { line }
            | ImportError::EmptyTitle { line }
            | ImportError::EmptyContent { line }
            | ImportError::InvalidDate { line }
            | ImportError::FieldTooLong { line, .. } => Some(*line),
            ImportError::Decode { .. } | ImportError::Unexpected(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_line() {
        assert_eq!(
            ImportError::EmptyTitle { line: 4 }.to_string(),
            "No posts have been created. Empty post title value in line 4"
        );
        assert_eq!(
            ImportError::FieldTooLong {
                line: 2,
                field: PostField::Title,
                max: 70
            }
            .to_string(),
            "No posts have been created. Post title in line 2 exceeds 70 characters"
        );
    }

    #[test]
    fn test_unexpected_message_hides_cause() {
        let err = ImportError::Unexpected(RepoError::Query("relation \"posts\" missing".into()));
        assert!(!err.to_string().contains("posts\" missing"));
        assert_eq!(err.line(), None);
        assert_eq!(err.kind(), "unexpected");
    }

    #[test]
    fn test_decode_mentions_delimiter() {
        let message = ImportError::Decode { delimiter: ';' }.to_string();
        assert!(message.contains("separated by ';'"));
    }
}
