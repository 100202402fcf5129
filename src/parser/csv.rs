//! Minimal CSV record codec.
//!
//! Clickstream exports and the edge lists we emit are plain RFC-4180-style
//! CSV: fields containing the delimiter, a quote, or a line break are
//! quoted, quotes are doubled, records end in CRLF. The reader accepts LF
//! or CRLF input and quoted fields that span physical lines; the writer
//! quotes minimally.

use crate::utils::error::ParseError;
use std::borrow::Cow;
use std::io::{self, BufRead, Write};

/// One decoded CSV record
///
/// **Public** - produced by `CsvReader`, consumed by the row parsers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based physical line the record starts on
    pub line: usize,

    /// Field values with quoting removed
    pub fields: Vec<String>,
}

/// Streaming CSV record reader over any buffered input
pub struct CsvReader<R: BufRead> {
    input: R,
    next_line: usize,
}

impl<R: BufRead> CsvReader<R> {
    /// Create a reader positioned at line 1 of the input
    pub fn new(input: R) -> Self {
        Self {
            input,
            next_line: 1,
        }
    }

    /// Read the next record, or None at end of input
    ///
    /// A record normally spans one physical line; an open quoted field
    /// pulls in further lines until the quote closes. Hitting end of
    /// input inside an open quote is an error.
    pub fn next_record(&mut self) -> Option<Result<Record, ParseError>> {
        let start_line = self.next_line;
        let mut raw = String::new();

        loop {
            let mut line = String::new();
            let read = match self.input.read_line(&mut line) {
                Ok(n) => n,
                Err(e) => return Some(Err(ParseError::Io(e))),
            };

            if read == 0 {
                if raw.is_empty() {
                    return None;
                }
                // Only reachable while a quoted field is still open
                return Some(Err(ParseError::UnterminatedQuote { line: start_line }));
            }

            self.next_line += 1;

            // Strip the terminator; a quoted line break is re-inserted as LF
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }

            if !raw.is_empty() {
                raw.push('\n');
            }
            raw.push_str(&line);

            match split_fields(&raw) {
                Split::Complete(fields) => {
                    return Some(Ok(Record {
                        line: start_line,
                        fields,
                    }))
                }
                Split::OpenQuote => continue,
            }
        }
    }
}

/// Outcome of splitting an accumulated record buffer
enum Split {
    Complete(Vec<String>),
    OpenQuote,
}

/// Split a raw record into fields, honoring quoting
///
/// **Private** - internal helper for `next_record`
fn split_fields(raw: &str) -> Split {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                ',' => fields.push(std::mem::take(&mut field)),
                // A quote only opens quoting at the start of a field;
                // mid-field quotes are kept literal
                '"' if field.is_empty() => in_quotes = true,
                _ => field.push(c),
            }
        }
    }

    if in_quotes {
        return Split::OpenQuote;
    }

    fields.push(field);
    Split::Complete(fields)
}

/// Write one CSV record with minimal quoting and a CRLF terminator
///
/// **Public** - used by every CSV-emitting writer
pub fn write_record<W: Write>(out: &mut W, fields: &[&str]) -> io::Result<()> {
    let mut first = true;
    for field in fields {
        if !first {
            out.write_all(b",")?;
        }
        first = false;
        out.write_all(escape_field(field).as_bytes())?;
    }
    out.write_all(b"\r\n")
}

/// Quote and escape a field when its content requires it
///
/// **Private** - internal helper for `write_record`
fn escape_field(field: &str) -> Cow<'_, str> {
    let needs_quoting = field.contains(',')
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r');

    if needs_quoting {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
