//! Decomposition record grammar.
//!
//! One record per line:
//!
//! ```text
//! KEY:SHAPE(COMP,COMP,...)COMMENT
//! 拉:a(扌,立)
//! 37650:d(丿,一)
//! ```
//!
//! Lines are split on `:`. A blank line or a line without any `:` is not a
//! record and is skipped; a line with exactly one `:` is parsed; anything else
//! is a structural error. `format_record_line` is the exact inverse for every
//! record `check_record_line` accepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::shape::{Arity, Shape};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompRecord {
    pub shape: Shape,
    pub components: Vec<String>,
    /// Free text after the closing parenthesis; never interpreted.
    pub comment: String,
}

impl DecompRecord {
    pub fn new(shape: impl Into<Shape>, components: Vec<String>, comment: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            components,
            comment: comment.into(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.components.is_empty()
    }

    /// The arity the shape expects, when the component count disagrees with it.
    pub fn arity_issue(&self) -> Option<Arity> {
        let arity = self.shape.arity();
        (!arity.accepts(self.components.len())).then_some(arity)
    }
}

impl fmt::Display for DecompRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}){}",
            self.shape,
            self.components.join(","),
            self.comment
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("expected `KEY:SHAPE(...)`, found {fields} `:`-separated fields")]
    FieldCount { fields: usize },
    #[error("record has an empty key")]
    EmptyKey,
    #[error("record for `{key}` has no `(` after the shape")]
    MissingOpenParen { key: String },
    #[error("record for `{key}` has no closing `)`")]
    MissingCloseParen { key: String },
    #[error("record for `{key}` would not read back: reserved character in its {part}")]
    Unwritable { key: String, part: &'static str },
}

/// Parse one line of the decomposition format.
///
/// Returns `Ok(None)` for lines that carry no record (blank, or a single
/// `:`-free field).
pub fn parse_record_line(line: &str) -> Result<Option<(String, DecompRecord)>, RecordParseError> {
    let fields: Vec<&str> = line.split(':').collect();
    let (key, rest) = match fields.as_slice() {
        [_] => return Ok(None),
        [key, rest] => (*key, *rest),
        _ => {
            return Err(RecordParseError::FieldCount {
                fields: fields.len(),
            })
        }
    };
    if key.is_empty() {
        return Err(RecordParseError::EmptyKey);
    }

    let (shape, remainder) = rest
        .split_once('(')
        .ok_or_else(|| RecordParseError::MissingOpenParen { key: key.to_string() })?;
    let (list, comment) = remainder
        .split_once(')')
        .ok_or_else(|| RecordParseError::MissingCloseParen { key: key.to_string() })?;

    let components = if list.is_empty() {
        Vec::new()
    } else {
        list.split(',').map(str::to_string).collect()
    };

    Ok(Some((
        key.to_string(),
        DecompRecord::new(shape, components, comment.trim_end_matches('\r')),
    )))
}

/// Render a record in the exact grammar `parse_record_line` accepts.
pub fn format_record_line(key: &str, record: &DecompRecord) -> String {
    format!("{key}:{record}")
}

/// Whether `format_record_line(key, record)` parses back to the same pair.
pub fn check_record_line(key: &str, record: &DecompRecord) -> Result<(), RecordParseError> {
    let unwritable = |part| {
        Err(RecordParseError::Unwritable {
            key: key.to_string(),
            part,
        })
    };
    if key.is_empty() || key.contains([':', '\n']) {
        return unwritable("key");
    }
    if record.shape.as_str().contains([':', '(', '\n']) {
        return unwritable("shape");
    }
    if record.components == [""]
        || record
            .components
            .iter()
            .any(|comp| comp.contains([':', ',', ')', '\n']))
    {
        return unwritable("components");
    }
    if record.comment.contains([':', '\n']) || record.comment.ends_with('\r') {
        return unwritable("comment");
    }
    Ok(())
}

/// All records of a text, with per-line errors kept aside.
#[derive(Debug, Clone, Default)]
pub struct ParsedRecords {
    pub records: Vec<(String, DecompRecord)>,
    /// `(zero-based line index, error)` for every rejected line.
    pub errors: Vec<(usize, RecordParseError)>,
}

pub fn parse_records(text: &str) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();
    for (idx, line) in text.split('\n').enumerate() {
        match parse_record_line(line) {
            Ok(Some(record)) => parsed.records.push(record),
            Ok(None) => {}
            Err(err) => parsed.errors.push((idx, err)),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_record() {
        let (key, rec) = parse_record_line("拉:a(扌,立)").unwrap().unwrap();
        assert_eq!(key, "拉");
        assert_eq!(rec.shape.as_str(), "a");
        assert_eq!(rec.components, vec!["扌", "立"]);
        assert_eq!(rec.comment, "");
    }

    #[test]
    fn empty_parens_mean_no_components() {
        let (_, rec) = parse_record_line("一:c()\r").unwrap().unwrap();
        assert!(rec.components.is_empty());
        assert!(rec.is_leaf());
    }

    #[test]
    fn comment_is_kept_and_carriage_return_trimmed() {
        let (_, rec) = parse_record_line("37650:d(丿,一) //see 丆\r").unwrap().unwrap();
        assert_eq!(rec.comment, " //see 丆");
        assert_eq!(format_record_line("37650", &rec), "37650:d(丿,一) //see 丆");
    }

    #[test]
    fn skips_blank_and_colon_free_lines() {
        assert_eq!(parse_record_line(""), Ok(None));
        assert_eq!(parse_record_line("# header"), Ok(None));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            parse_record_line("a:b:c()"),
            Err(RecordParseError::FieldCount { fields: 3 })
        );
        assert!(matches!(
            parse_record_line("拉:a"),
            Err(RecordParseError::MissingOpenParen { .. })
        ));
        assert!(matches!(
            parse_record_line("拉:a(扌,立"),
            Err(RecordParseError::MissingCloseParen { .. })
        ));
        assert_eq!(parse_record_line(":a()"), Err(RecordParseError::EmptyKey));
    }

    #[test]
    fn reserved_characters_make_a_record_unwritable() {
        let see = DecompRecord::new("a", vec!["扌".to_string(), "立".to_string()], " //see:丆");
        assert_eq!(
            check_record_line("拉", &see),
            Err(RecordParseError::Unwritable {
                key: "拉".to_string(),
                part: "comment"
            })
        );
        assert_eq!(
            parse_record_line(&format_record_line("拉", &see)),
            Err(RecordParseError::FieldCount { fields: 3 })
        );

        let comma = DecompRecord::new("a", vec!["扌,立".to_string()], "");
        assert!(matches!(
            check_record_line("拉", &comma),
            Err(RecordParseError::Unwritable { part: "components", .. })
        ));
        let empty = DecompRecord::new("c", vec![String::new()], "");
        assert!(check_record_line("一", &empty).is_err());
        assert!(check_record_line("", &DecompRecord::new("c", vec![], "")).is_err());
        assert!(check_record_line("一", &DecompRecord::new("c(", vec![], "")).is_err());

        let fine = DecompRecord::new("a", vec!["扌".to_string(), "立".to_string()], " (see 丆)");
        assert_eq!(check_record_line("拉", &fine), Ok(()));
        assert_eq!(
            parse_record_line(&format_record_line("拉", &fine)),
            Ok(Some(("拉".to_string(), fine)))
        );
    }

    #[test]
    fn parse_records_collects_errors_with_line_numbers() {
        let parsed = parse_records("拉:a(扌,立)\nbad:line:here\n\n扌:c()\n");
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].0, 1);
    }

    #[test]
    fn arity_issue_reports_expected_arity() {
        let rec = DecompRecord::new("a", vec!["木".to_string()], "");
        assert_eq!(rec.arity_issue(), Some(Arity::AtLeast(2)));
        let ok = DecompRecord::new("s", vec!["囗".to_string(), "玉".to_string()], "");
        assert_eq!(ok.arity_issue(), None);
    }
}
