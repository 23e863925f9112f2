//! Minimal CSV writer and reader for vocabulary exports.
//!
//! Fields containing a quote, comma or line break are wrapped in quotes with
//! embedded quotes doubled. Rows end with `\n`.

use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Quotes `value` when needed.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains(&['"', ',', '\n', '\r'][..]) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

pub fn format_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|field| escape_field(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Joins rows into a document, each row terminated by `\n`.
pub fn format_document(rows: &[Vec<String>]) -> String {
    rows.iter().fold(String::new(), |mut out, row| {
        out.push_str(&format_row(row));
        out.push('\n');
        out
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvParseError {
    /// A quoted field was never closed.
    UnterminatedQuote { row: usize },
    /// Text followed a closing quote before the next separator.
    TrailingCharacters { row: usize },
}

impl Display for CsvParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedQuote { row } => write!(f, "unterminated quoted field in row {row}"),
            Self::TrailingCharacters { row } => {
                write!(f, "unexpected characters after closing quote in row {row}")
            }
        }
    }
}

impl Error for CsvParseError {}

/// Parses a document produced by [`format_document`].
pub fn parse_document(text: &str) -> Result<Vec<Vec<String>>, CsvParseError> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut chars = text.chars().peekable();
    let mut quoted = false;
    let mut closed = false;
    let mut dirty = false;

    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    quoted = false;
                    closed = true;
                }
                other => field.push(other),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() && !closed => {
                quoted = true;
                dirty = true;
            }
            ',' => {
                row.push(std::mem::take(&mut field));
                closed = false;
                dirty = true;
            }
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                closed = false;
                dirty = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            _ if closed => {
                return Err(CsvParseError::TrailingCharacters { row: rows.len() });
            }
            other => {
                field.push(other);
                dirty = true;
            }
        }
    }

    if quoted {
        return Err(CsvParseError::UnterminatedQuote { row: rows.len() });
    }
    if dirty {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}
