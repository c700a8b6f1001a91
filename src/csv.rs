//! CSV dialect codec: parsing and serialization with quote handling
//!
//! The dialect is delimiter-separated text with optional double-quote
//! enclosure. A field is quoted when it contains the delimiter, a quote, or
//! a line terminator; a literal quote inside a quoted field is written as
//! two consecutive quotes. `\n`, `\r\n`, and bare `\r` all terminate a row.
//!
//! The parser never fails: an unterminated quote absorbs the remainder of
//! the input as literal text. Malformed quoting is a tolerated data
//! condition, not an error.

/// Dialect parameters for the codec. Only the delimiter varies; quoting is
/// always double-quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl Dialect {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Parse raw text into rows of fields. The first row is conventionally
    /// the header. A trailing row with no line terminator is still emitted
    /// if it accumulated any content.
    pub fn parse(&self, text: &str) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut row: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch == '"' {
                if in_quotes && chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
                continue;
            }

            if !in_quotes && (ch == self.delimiter || ch == '\n' || ch == '\r') {
                row.push(std::mem::take(&mut field));

                if ch == self.delimiter {
                    continue;
                }

                // \r\n counts as one terminator; a bare \r still ends the row
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }

                rows.push(std::mem::take(&mut row));
                continue;
            }

            field.push(ch);
        }

        if !field.is_empty() || !row.is_empty() {
            row.push(field);
            rows.push(row);
        }

        rows
    }

    /// Serialize rows back to text. Rows are joined by a single `\n` with no
    /// trailing terminator.
    pub fn serialize(&self, rows: &[Vec<String>]) -> String {
        let delimiter = self.delimiter.to_string();
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|field| self.encode_field(field))
                    .collect::<Vec<_>>()
                    .join(&delimiter)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Quote a field iff it contains the delimiter, a quote, or a line
    /// terminator; otherwise emit it bare.
    fn encode_field(&self, value: &str) -> String {
        let needs_quoting = value.contains(self.delimiter)
            || value.contains('"')
            || value.contains('\n')
            || value.contains('\r');

        if needs_quoting {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

/// Parse with the default comma dialect.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    Dialect::default().parse(text)
}

/// Serialize with the default comma dialect.
pub fn serialize(rows: &[Vec<String>]) -> String {
    Dialect::default().serialize(rows)
}

/// Strip surrounding whitespace and a UTF-8 byte-order mark from raw input
/// text before parsing. Snapshot files fetched from registries occasionally
/// carry either.
pub fn normalize_input(text: &str) -> &str {
    text.trim_matches(|c: char| c == '\u{feff}' || c.is_whitespace())
}
