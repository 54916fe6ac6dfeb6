//! Field checks for one tokenized record, and the record it turns into.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use uuid::Uuid;

use super::error::{ImportError, PostField};
use super::tokenizer::RawRecord;
use crate::domain::Post;

/// `hh:mi:ss dd.mm.yyyy`, 24-hour clock.
pub const PUBLICATION_FORMAT: &str = "%H:%M:%S %d.%m.%Y";

/// Expected shape of a publication timestamp; `0` marks a digit.
const PUBLICATION_SHAPE: &[u8; 19] = b"00:00:00 00.00.0000";

/// A record that passed validation, not yet bound to an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub title: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
}

impl PostRecord {
    pub fn into_post(self, author_id: Uuid) -> Post {
        Post::published_at(author_id, self.title, self.content, self.published_at)
    }
}

/// Per-record checks, applied in order: field count, title, content, date, lengths.
#[derive(Debug, Clone, Copy)]
pub struct RecordValidator {
    pub max_title_length: usize,
    pub max_content_length: usize,
}

impl RecordValidator {
    pub fn validate(&self, record: RawRecord) -> Result<PostRecord, ImportError> {
        let line = record.line;
        let [title, content, published]: [String; 3] = record
            .fields
            .try_into()
            .map_err(|_| ImportError::MalformedLine { line })?;

        if title.is_empty() {
            return Err(ImportError::EmptyTitle { line });
        }
        if content.is_empty() {
            return Err(ImportError::EmptyContent { line });
        }
        let published_at =
            parse_publication_time(&published).ok_or(ImportError::InvalidDate { line })?;

        check_length(&title, self.max_title_length, PostField::Title, line)?;
        check_length(&content, self.max_content_length, PostField::Content, line)?;

        Ok(PostRecord {
            title,
            content,
            published_at,
        })
    }
}

fn check_length(value: &str, max: usize, field: PostField, line: usize) -> Result<(), ImportError> {
    if value.chars().count() > max {
        return Err(ImportError::FieldTooLong { line, field, max });
    }
    Ok(())
}

/// Parse `hh:mi:ss dd.mm.yyyy`. Only the zero-padded form is accepted.
pub fn parse_publication_time(text: &str) -> Option<DateTime<Utc>> {
    let bytes = text.as_bytes();
    if bytes.len() != PUBLICATION_SHAPE.len() {
        return None;
    }
    let shape_ok = bytes
        .iter()
        .zip(PUBLICATION_SHAPE)
        .all(|(b, s)| if *s == b'0' { b.is_ascii_digit() } else { b == s });
    if !shape_ok {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(text, PUBLICATION_FORMAT).ok()?;
    // chrono reads second 60 as a leap second and accepts year 0
    if naive.nanosecond() >= 1_000_000_000 || naive.year() < 1 {
        return None;
    }
    Some(naive.and_utc())
}

/// Inverse of [`parse_publication_time`].
pub fn format_publication_time(at: &DateTime<Utc>) -> String {
    at.format(PUBLICATION_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> RecordValidator {
        RecordValidator {
            max_title_length: 70,
            max_content_length: 200,
        }
    }

    fn record(fields: &[&str]) -> RawRecord {
        RawRecord {
            line: 3,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_record() {
        let parsed = validator()
            .validate(record(&["Title A", "Body A", "12:01:23 03.04.2021"]))
            .unwrap();

        assert_eq!(parsed.title, "Title A");
        assert_eq!(parsed.content, "Body A");
        assert_eq!(parsed.published_at.hour(), 12);
        assert_eq!(parsed.published_at.second(), 23);
        assert_eq!(parsed.published_at.day(), 3);
        assert_eq!(parsed.published_at.month(), 4);
        assert_eq!(parsed.published_at.year(), 2021);
    }

    #[test]
    fn test_wrong_field_count() {
        for fields in [&["only one"][..], &["a", "b"], &["a", "b", "c", "d"]] {
            assert!(matches!(
                validator().validate(record(fields)),
                Err(ImportError::MalformedLine { line: 3 })
            ));
        }
    }

    #[test]
    fn test_checks_run_in_order() {
        // empty title wins over a bad date and empty content
        assert!(matches!(
            validator().validate(record(&["", "", "garbage"])),
            Err(ImportError::EmptyTitle { line: 3 })
        ));
        assert!(matches!(
            validator().validate(record(&["t", "", "garbage"])),
            Err(ImportError::EmptyContent { line: 3 })
        ));
        assert!(matches!(
            validator().validate(record(&["t", "c", "garbage"])),
            Err(ImportError::InvalidDate { line: 3 })
        ));
    }

    #[test]
    fn test_length_limits_count_characters() {
        let title = "я".repeat(70);
        assert!(validator()
            .validate(record(&[&title, "c", "00:00:00 01.01.2000"]))
            .is_ok());

        let title = "я".repeat(71);
        assert!(matches!(
            validator().validate(record(&[&title, "c", "00:00:00 01.01.2000"])),
            Err(ImportError::FieldTooLong {
                field: PostField::Title,
                max: 70,
                ..
            })
        ));

        let content = "x".repeat(201);
        assert!(matches!(
            validator().validate(record(&["t", &content, "00:00:00 01.01.2000"])),
            Err(ImportError::FieldTooLong {
                field: PostField::Content,
                ..
            })
        ));
    }

    #[test]
    fn test_publication_time_is_strict() {
        assert!(parse_publication_time("01:01:01 01.01.2011").is_some());
        assert!(parse_publication_time("23:59:59 31.12.1999").is_some());

        assert!(parse_publication_time("1:01:01 01.01.2011").is_none());
        assert!(parse_publication_time("01:01:01 1.1.2011").is_none());
        assert!(parse_publication_time("24:00:00 01.01.2011").is_none());
        assert!(parse_publication_time("12:00:00 31.02.2021").is_none());
        assert!(parse_publication_time("2021-04-03 12:01:23").is_none());
        assert!(parse_publication_time(" 12:01:23 03.04.2021").is_none());
        assert!(parse_publication_time("").is_none());
        assert!(parse_publication_time("12:30:60 01.01.2020").is_none());
        assert!(parse_publication_time("23:59:60 31.12.2016").is_none());
        assert!(parse_publication_time("01:01:01 01.01.0000").is_none());
        assert!(parse_publication_time("01:01:01 01.01.0001").is_some());
    }

    #[test]
    fn test_format_publication_time_round_trips() {
        let text = "13:13:13 13.08.2013";
        let parsed = parse_publication_time(text).unwrap();
        assert_eq!(format_publication_time(&parsed), text);
    }

    #[test]
    fn test_leap_second_line_is_invalid_date() {
        assert!(matches!(
            validator().validate(record(&["T", "C", "12:30:60 01.01.2020"])),
            Err(ImportError::InvalidDate { line: 3 })
        ));
    }

    #[test]
    fn test_into_post_binds_author() {
        let author = Uuid::new_v4();
        let post = validator()
            .validate(record(&["t", "c", "00:00:00 01.01.2000"]))
            .unwrap()
            .into_post(author);
        assert_eq!(post.author_id, author);
        assert_eq!(post.title, "t");
    }
}
