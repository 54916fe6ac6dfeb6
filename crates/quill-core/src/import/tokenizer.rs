//! Splitting an uploaded posts file into records.
//!
//! One record per line, fields separated by a single-character delimiter.
//! A field that starts with `"` is quoted: it may contain the delimiter and
//! line breaks, and `""` inside it stands for a literal quote.

use std::iter::Peekable;
use std::str::CharIndices;

use super::error::ImportError;

const QUOTE: char = '"';

/// One tokenized record together with its 1-based record number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Decode the uploaded bytes. Nothing else is attempted on invalid UTF-8.
pub fn decode(bytes: &[u8], delimiter: char) -> Result<&str, ImportError> {
    std::str::from_utf8(bytes).map_err(|_| ImportError::Decode { delimiter })
}

/// Lazy iterator over the records of a decoded file.
///
/// Cloning gives an independent cursor at the same position.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    text: &'a str,
    delimiter: char,
    pos: usize,
    line: usize,
    finished: bool,
}

/// Iterate the records of `text`.
///
/// A final line break does not produce an extra empty record.
pub fn records(text: &str, delimiter: char) -> Records<'_> {
    Records {
        text,
        delimiter,
        pos: 0,
        line: 0,
        finished: false,
    }
}

impl Records<'_> {
    fn next_record(&mut self) -> Result<RawRecord, ImportError> {
        self.line += 1;
        let line = self.line;

        let text = self.text;
        let mut chars = text[self.pos..].char_indices().peekable();
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut field_started = false;
        let mut in_quotes = false;

        while let Some((i, c)) = chars.next() {
            if in_quotes {
                if c == QUOTE {
                    if next_is(&mut chars, QUOTE) {
                        chars.next();
                        field.push(QUOTE);
                    } else {
                        in_quotes = false;
                    }
                } else {
                    field.push(c);
                }
                continue;
            }

            match c {
                '\n' => {
                    self.pos += i + 1;
                    fields.push(field);
                    return Ok(RawRecord { line, fields });
                }
                '\r' if next_is(&mut chars, '\n') => {
                    self.pos += i + 2;
                    fields.push(field);
                    return Ok(RawRecord { line, fields });
                }
                c if c == self.delimiter => {
                    fields.push(std::mem::take(&mut field));
                    field_started = false;
                }
                QUOTE if !field_started => {
                    in_quotes = true;
                    field_started = true;
                }
                c => {
                    field.push(c);
                    field_started = true;
                }
            }
        }

        self.pos = text.len();
        if in_quotes {
            return Err(ImportError::MalformedLine { line });
        }
        fields.push(field);
        Ok(RawRecord { line, fields })
    }
}

fn next_is(chars: &mut Peekable<CharIndices<'_>>, expected: char) -> bool {
    matches!(chars.peek(), Some(&(_, c)) if c == expected)
}

impl Iterator for Records<'_> {
    type Item = Result<RawRecord, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.pos >= self.text.len() {
            return None;
        }

        let record = self.next_record();
        if record.is_err() {
            self.finished = true;
        }
        Some(record)
    }
}

/// Serialize fields into one line of the posts file format (without the line break).
pub fn write_record(fields: &[&str], delimiter: char) -> String {
    fields
        .iter()
        .map(|field| quote_field(field, delimiter))
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}

fn quote_field(field: &str, delimiter: char) -> String {
    let needs_quotes = field.starts_with(QUOTE)
        || field.contains(|c| c == delimiter || c == '\n' || c == '\r');

    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str, delimiter: char) -> Vec<Vec<String>> {
        records(text, delimiter)
            .map(|r| r.unwrap().fields)
            .collect()
    }

    #[test]
    fn test_splits_lines_and_fields() {
        let rows = collect("a|b|c\nd|e|f", '|');
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    }

    #[test]
    fn test_trailing_newline_yields_no_record() {
        assert_eq!(collect("a|b|c\n", '|').len(), 1);
        assert_eq!(collect("a|b|c\r\n", '|').len(), 1);
        assert!(collect("", '|').is_empty());
    }

    #[test]
    fn test_blank_line_in_the_middle_is_a_single_empty_field() {
        let rows = collect("a|b|c\n\nd|e|f", '|');
        assert_eq!(rows[1], vec![String::new()]);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_crlf_line_endings() {
        let rows = collect("a|b|c\r\nd|e|f\r\n", '|');
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    }

    #[test]
    fn test_quoted_field_keeps_delimiter_and_newline() {
        let rows = collect("\"a|b\"|\"line 1\nline 2\"|c\nnext|x|y", '|');
        assert_eq!(rows[0], vec!["a|b", "line 1\nline 2", "c"]);
        assert_eq!(rows[1], vec!["next", "x", "y"]);
    }

    #[test]
    fn test_doubled_quote_inside_quoted_field() {
        let rows = collect("\"say \"\"hi\"\"\"|b|c", '|');
        assert_eq!(rows[0][0], "say \"hi\"");
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        let rows = collect("a\"b|c|d", '|');
        assert_eq!(rows[0][0], "a\"b");
    }

    #[test]
    fn test_line_numbers_count_records() {
        let lines: Vec<usize> = records("a\n\"b\nc\"\nd", ',')
            .map(|r| r.unwrap().line)
            .collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_unterminated_quote_is_malformed() {
        let mut it = records("a|b|c\n\"open|b|c", '|');
        assert!(it.next().unwrap().is_ok());
        assert!(matches!(
            it.next(),
            Some(Err(ImportError::MalformedLine { line: 2 }))
        ));
        assert!(it.next().is_none());
    }

    #[test]
    fn test_records_are_restartable() {
        let first = records("a|b|c\nd|e|f", '|');
        let again = first.clone();
        assert_eq!(first.count(), 2);
        assert_eq!(again.count(), 2);
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, b'|'];
        assert!(matches!(
            decode(&bytes, '|'),
            Err(ImportError::Decode { delimiter: '|' })
        ));
    }

    #[test]
    fn test_write_record_quotes_only_when_needed() {
        assert_eq!(write_record(&["a", "b", "c"], '|'), "a|b|c");
        assert_eq!(
            write_record(&["a|b", "two\nlines", "say \"hi\""], '|'),
            "\"a|b\"|\"two\nlines\"|say \"hi\""
        );
        assert_eq!(write_record(&["\"lead", "x", "y"], ';'), "\"\"\"lead\";x;y");
    }

    #[test]
    fn test_write_record_reads_back() {
        let fields = ["a|b", "\"quoted\" and\nwrapped", "12:00:00 01.01.2020"];
        let line = write_record(&fields, '|');
        let rows = collect(&line, '|');
        assert_eq!(rows, vec![fields.to_vec()]);
    }
}
