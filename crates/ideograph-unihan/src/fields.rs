//! The shared Unihan line format.

use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;

/// One `U+XXXX<TAB>FIELD<TAB>VALUE` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLine<'a> {
    pub ch: char,
    pub field: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnihanLineError {
    #[error("expected three tab-separated fields, found {found}")]
    FieldCount { found: usize },
    #[error("invalid code point `{text}`")]
    CodePoint { text: String },
}

/// Parse `U+XXXX` into a scalar.
pub fn parse_code_point(text: &str) -> Result<char, UnihanLineError> {
    text.strip_prefix("U+")
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        .and_then(char::from_u32)
        .ok_or_else(|| UnihanLineError::CodePoint {
            text: text.to_string(),
        })
}

/// Parse one line. Blank and `#` lines yield `Ok(None)`.
pub fn parse_field_line(line: &str) -> Result<Option<FieldLine<'_>>, UnihanLineError> {
    let line = line.trim_end_matches('\r');
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut parts = line.splitn(3, '\t');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(cp), Some(field), Some(value)) => Ok(Some(FieldLine {
            ch: parse_code_point(cp)?,
            field,
            value,
        })),
        (_, field, _) => Err(UnihanLineError::FieldCount {
            found: if field.is_some() { 2 } else { 1 },
        }),
    }
}

/// Feed every field line of `text` to `visit`, logging and returning the
/// rejected lines.
pub fn for_each_field<'a>(
    text: &'a str,
    mut visit: impl FnMut(FieldLine<'a>),
) -> Vec<(usize, UnihanLineError)> {
    let mut errors = Vec::new();
    for (idx, line) in text.split('\n').enumerate() {
        match parse_field_line(line) {
            Ok(Some(field)) => visit(field),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(line = idx + 1, error = %err, "skipping malformed Unihan line");
                errors.push((idx, err));
            }
        }
    }
    errors
}

pub(crate) fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read Unihan file {}", path.display()))
}
