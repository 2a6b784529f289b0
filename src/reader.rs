//! Delimited table reader
//!
//! Turns delimited text into rows of string tokens. Header rows are kept aside
//! untouched and the data rows can be capped at a row limit.

use crate::config::AnalysisConfig;
use crate::error::BoutError;
use crate::types::Token;
use std::fs;
use std::path::Path;

/// Rows read from one input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Leading rows, passed through untouched
    pub header_rows: Vec<Vec<Token>>,
    /// Data rows in file order
    pub rows: Vec<Vec<Token>>,
    /// Set when data rows beyond the row limit were dropped
    pub truncated_at: Option<usize>,
}

/// Reader for delimiter-separated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedReader {
    delimiter: String,
    header_rows: usize,
    max_rows: Option<usize>,
}

impl DelimitedReader {
    pub fn new(delimiter: impl Into<String>, header_rows: usize, max_rows: Option<usize>) -> Self {
        Self {
            delimiter: delimiter.into(),
            header_rows,
            max_rows,
        }
    }

    /// Create a reader from the table-format part of a configuration
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.delimiter.clone(), config.header_rows, config.max_rows)
    }

    /// Read and parse a file
    pub fn read_path(&self, path: &Path) -> Result<Table, BoutError> {
        let text = fs::read_to_string(path)?;
        self.parse_str(&text)
    }

    /// Parse a whole document
    pub fn parse_str(&self, text: &str) -> Result<Table, BoutError> {
        let mut table = Table::default();

        for (line_no, line) in text.lines().enumerate() {
            if line_no < self.header_rows {
                table.header_rows.push(self.split_line(line, line_no)?);
                continue;
            }
            if let Some(limit) = self.max_rows {
                if table.rows.len() >= limit {
                    table.truncated_at = Some(limit);
                    break;
                }
            }
            table.rows.push(self.split_line(line, line_no)?);
        }

        Ok(table)
    }

    /// Split one line into fields. A blank line is a row without fields.
    fn split_line(&self, line: &str, line_no: usize) -> Result<Vec<Token>, BoutError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return Ok(Vec::new());
        }

        let mut fields = Vec::new();
        let mut rest = line;
        loop {
            let (field, remainder) = if let Some(quoted) = rest.strip_prefix('"') {
                self.take_quoted(quoted, line_no)?
            } else {
                match rest.find(self.delimiter.as_str()) {
                    Some(pos) => (
                        rest[..pos].to_string(),
                        Some(&rest[pos + self.delimiter.len()..]),
                    ),
                    None => (rest.to_string(), None),
                }
            };
            fields.push(field);
            match remainder {
                Some(next) => rest = next,
                None => break,
            }
        }
        Ok(fields)
    }

    /// Consume a quoted field (opening quote already stripped). Returns the field
    /// and the text after the following delimiter, if any.
    fn take_quoted<'a>(
        &self,
        text: &'a str,
        line_no: usize,
    ) -> Result<(String, Option<&'a str>), BoutError> {
        let mut field = String::new();
        let mut chars = text.char_indices();
        while let Some((idx, ch)) = chars.next() {
            if ch != '"' {
                field.push(ch);
                continue;
            }
            let after = &text[idx + 1..];
            if after.starts_with('"') {
                field.push('"');
                chars.next();
                continue;
            }
            // Closing quote; anything up to the next delimiter is kept verbatim
            return Ok(match after.find(self.delimiter.as_str()) {
                Some(pos) => {
                    field.push_str(&after[..pos]);
                    (field, Some(&after[pos + self.delimiter.len()..]))
                }
                None => {
                    field.push_str(after);
                    (field, None)
                }
            });
        }
        Err(BoutError::ParseError(format!(
            "unterminated quoted field on line {}",
            line_no + 1
        )))
    }
}
