//! Bulk post import from a delimited text file.
//!
//! The pipeline runs in two phases. First every record is tokenized,
//! validated and bound to the author; the first failure ends the attempt.
//! Only when the whole file is good is the batch handed to
//! [`PostRepository::create_batch`], which commits all posts or none.
//!
//! File format, one post per line:
//!
//! ```text
//! <title>|<content>|<hh:mi:ss dd.mm.yyyy>
//! ```

mod error;
mod outcome;
mod tokenizer;
mod validator;

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Post;
use crate::ports::PostRepository;

pub use error::{ImportError, PostField};
pub use outcome::ImportOutcome;
pub use tokenizer::{RawRecord, Records, decode, records, write_record};
pub use validator::{
    PUBLICATION_FORMAT, PostRecord, RecordValidator, format_publication_time,
    parse_publication_time,
};

/// Default field delimiter of the posts file.
pub const DEFAULT_DELIMITER: char = '|';

/// Longest accepted post title, in characters.
pub const MAX_TITLE_LENGTH: usize = 70;

/// Import settings, fixed when the importer is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportConfig {
    pub delimiter: char,
    pub max_title_length: usize,
    pub max_content_length: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            max_title_length: MAX_TITLE_LENGTH,
            max_content_length: 10_000,
        }
    }
}

impl ImportConfig {
    /// Whether `c` can separate fields: the quote char and line breaks cannot.
    pub fn is_valid_delimiter(c: char) -> bool {
        !matches!(c, '"' | '\n' | '\r')
    }

    fn validator(&self) -> RecordValidator {
        RecordValidator {
            max_title_length: self.max_title_length,
            max_content_length: self.max_content_length,
        }
    }
}

/// Turns uploaded files into committed posts.
pub struct PostImporter {
    config: ImportConfig,
    posts: Arc<dyn PostRepository>,
}

impl PostImporter {
    pub fn new(config: ImportConfig, posts: Arc<dyn PostRepository>) -> Self {
        Self { config, posts }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Decode, tokenize and validate the whole file without touching storage.
    pub fn parse(&self, author_id: Uuid, bytes: &[u8]) -> Result<Vec<Post>, ImportError> {
        let text = decode(bytes, self.config.delimiter)?;
        let validator = self.config.validator();

        let posts = records(text, self.config.delimiter)
            .map(|record| {
                record
                    .and_then(|record| validator.validate(record))
                    .map(|record| record.into_post(author_id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if posts.is_empty() {
            return Err(ImportError::MalformedLine { line: 1 });
        }
        Ok(posts)
    }

    /// Parse the file and commit it. Returns the number of created posts.
    pub async fn run(&self, author_id: Uuid, bytes: &[u8]) -> Result<u64, ImportError> {
        let posts = self.parse(author_id, bytes)?;
        self.posts
            .create_batch(posts)
            .await
            .map_err(ImportError::Unexpected)
    }

    /// [`run`](Self::run), reported as an [`ImportOutcome`].
    pub async fn import(&self, author_id: Uuid, bytes: &[u8]) -> ImportOutcome {
        self.run(author_id, bytes).await.into()
    }

    /// Write posts back in the import format, one line each.
    pub fn export(&self, posts: &[Post]) -> String {
        posts
            .iter()
            .map(|post| {
                let published = format_publication_time(&post.published_at);
                write_record(
                    &[post.title.as_str(), post.content.as_str(), published.as_str()],
                    self.config.delimiter,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
