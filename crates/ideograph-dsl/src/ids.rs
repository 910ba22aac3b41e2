//! Ideographic description sequences (IDS).
//!
//! External IDS data uses the Unicode prefix notation:
//!
//! ```text
//! ⿰氵工          binary: across
//! ⿲丨丨⿱⿸𠂉丶𫩏  ternary: across, third operand nested
//! ↔夂             unary: horizontal mirror
//! ⿰氶{27}        `{NN}` escape standing for an unencoded component
//! ```
//!
//! A sequence is mapped onto the same `(shape, components)` form the record
//! grammar uses so the two data sets can be compared key by key. Operands are
//! kept as raw sub-sequences (`⿱⿸𠂉丶𫩏` stays one component).
//!
//! The file format is `codepoint<TAB>character<TAB>description`, where the
//! description may hold several tab-separated alternatives.

use ahash::AHashMap;
use nom::{
    bytes::complete::take_until,
    character::complete::{anychar, char as pchar},
    combinator::recognize,
    error::{Error as NomError, ErrorKind},
    sequence::terminated,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Nesting bound for operand recursion; real sequences stay far below it.
const MAX_IDS_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdsOperator {
    Across,
    Down,
    Surround,
    SurroundTop,
    SurroundBottom,
    SurroundLeft,
    SurroundTopLeft,
    SurroundTopRight,
    SurroundBottomLeft,
    Overlay,
    Across3,
    Down3,
    Mirror,
    Rotate,
}

impl IdsOperator {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '⿰' => Self::Across,
            '⿱' => Self::Down,
            '⿴' => Self::Surround,
            '⿵' => Self::SurroundTop,
            '⿶' => Self::SurroundBottom,
            '⿷' => Self::SurroundLeft,
            '⿸' => Self::SurroundTopLeft,
            '⿹' => Self::SurroundTopRight,
            '⿺' => Self::SurroundBottomLeft,
            '⿻' => Self::Overlay,
            '⿲' => Self::Across3,
            '⿳' => Self::Down3,
            '↔' => Self::Mirror,
            '↷' => Self::Rotate,
            _ => return None,
        })
    }

    pub fn arity(self) -> usize {
        match self {
            Self::Mirror | Self::Rotate => 1,
            Self::Across3 | Self::Down3 => 3,
            _ => 2,
        }
    }

    /// The decomposition-record shape this operator corresponds to.
    pub fn shape(self) -> &'static str {
        match self {
            Self::Across | Self::Across3 => "a",
            Self::Down | Self::Down3 => "d",
            Self::Surround => "s",
            Self::SurroundTop => "st",
            Self::SurroundBottom => "sb",
            Self::SurroundLeft => "sl",
            Self::SurroundTopLeft => "stl",
            Self::SurroundTopRight => "str",
            Self::SurroundBottomLeft => "sbl",
            Self::Overlay => "lock",
            Self::Mirror => "ref",
            Self::Rotate => "rot",
        }
    }
}

/// `true` when `s` is empty or starts with something that is not a plain
/// character: an operator, an escape, or the unknown marker.
pub fn is_structural(s: &str) -> bool {
    match s.chars().next() {
        None => true,
        Some(c) => IdsOperator::from_char(c).is_some() || c == '{' || c == '？',
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdsKind {
    Composed(IdsOperator),
    /// A lone character with no operator.
    Single(char),
    /// Several alternative descriptions.
    Alternatives,
    /// The fullwidth `？` placeholder.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdsDecomp {
    pub kind: IdsKind,
    pub components: Vec<String>,
}

impl IdsDecomp {
    /// The record shape, when the description has one (`Single` and
    /// `Unknown` have none).
    pub fn shape(&self) -> Option<&'static str> {
        match &self.kind {
            IdsKind::Composed(op) => Some(op.shape()),
            IdsKind::Alternatives => Some("alt"),
            IdsKind::Single(_) | IdsKind::Unknown => None,
        }
    }

    /// Token used by reports: the shape, or `single` / `unknown`.
    pub fn shape_token(&self) -> &'static str {
        match &self.kind {
            IdsKind::Single(_) => "single",
            IdsKind::Unknown => "unknown",
            _ => self.shape().unwrap_or_default(),
        }
    }

    pub fn is_composed(&self) -> bool {
        matches!(self.kind, IdsKind::Composed(_))
    }
}

impl fmt::Display for IdsDecomp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.shape_token(), self.components.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdsParseError {
    #[error("empty description sequence")]
    Empty,
    /// `{NN}` escapes only ever appear as operands; one in first position
    /// means the input file is corrupt.
    #[error("numeric escape at the top level of `{sequence}`")]
    TopLevelEscape { sequence: String },
    #[error("operand {index} of `{operator}` missing or malformed in `{sequence}`")]
    MissingOperand {
        sequence: String,
        operator: char,
        index: usize,
    },
}

fn depth_error(input: &str) -> nom::Err<NomError<&str>> {
    nom::Err::Failure(NomError::new(input, ErrorKind::TooLarge))
}

/// One complete operand: an operator with its operands, an escape, or a
/// single character.
fn ids_node(input: &str, depth: usize) -> IResult<&str, ()> {
    if depth > MAX_IDS_DEPTH {
        return Err(depth_error(input));
    }
    let (mut rest, c) = anychar::<_, NomError<&str>>(input)?;
    if let Some(op) = IdsOperator::from_char(c) {
        for _ in 0..op.arity() {
            let (next, _) = ids_node(rest, depth + 1)?;
            rest = next;
        }
        return Ok((rest, ()));
    }
    if c == '{' {
        let (next, _) =
            terminated(take_until::<_, _, NomError<&str>>("}"), pchar('}'))(rest)?;
        return Ok((next, ()));
    }
    Ok((rest, ()))
}

fn operand(input: &str) -> IResult<&str, &str> {
    recognize(|i| ids_node(i, 1))(input)
}

/// Strip outer `^…$` or `[…]` delimiters (anything after the closing
/// delimiter, such as source tags, is dropped).
pub fn strip_delimiters(s: &str) -> &str {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('^') {
        return inner.rfind('$').map(|end| &inner[..end]).unwrap_or(inner);
    }
    if let Some(inner) = s.strip_prefix('[') {
        return inner.rfind(']').map(|end| &inner[..end]).unwrap_or(inner);
    }
    s
}

/// Parse one description (or a tab-separated list of alternatives).
pub fn parse_ids_sequence(seq: &str) -> Result<IdsDecomp, IdsParseError> {
    if seq.contains('\t') {
        return Ok(IdsDecomp {
            kind: IdsKind::Alternatives,
            components: seq
                .split('\t')
                .filter(|alt| !alt.trim().is_empty())
                .map(|alt| strip_delimiters(alt).to_string())
                .collect(),
        });
    }

    let body = strip_delimiters(seq);
    let first = body.chars().next().ok_or(IdsParseError::Empty)?;

    if let Some(op) = IdsOperator::from_char(first) {
        let mut rest = &body[first.len_utf8()..];
        let mut components = Vec::with_capacity(op.arity());
        for index in 0..op.arity() {
            let (next, comp) = operand(rest).map_err(|_| IdsParseError::MissingOperand {
                sequence: body.to_string(),
                operator: first,
                index,
            })?;
            components.push(comp.to_string());
            rest = next;
        }
        return Ok(IdsDecomp {
            kind: IdsKind::Composed(op),
            components,
        });
    }

    match first {
        '？' => Ok(IdsDecomp {
            kind: IdsKind::Unknown,
            components: Vec::new(),
        }),
        '{' => Err(IdsParseError::TopLevelEscape {
            sequence: body.to_string(),
        }),
        c => Ok(IdsDecomp {
            kind: IdsKind::Single(c),
            components: vec![c.to_string()],
        }),
    }
}

/// Parsed IDS file, keyed by character.
#[derive(Debug, Clone, Default)]
pub struct IdsTable {
    order: Vec<String>,
    entries: AHashMap<String, IdsDecomp>,
    /// `(zero-based line index, error)` for descriptions that failed to parse.
    pub rejected: Vec<(usize, IdsParseError)>,
    /// Zero-based indices of lines with fewer than three fields.
    pub malformed: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {source}")]
pub struct IdsFileError {
    pub line: usize,
    #[source]
    pub source: IdsParseError,
}

impl IdsTable {
    pub fn get(&self, key: &str) -> Option<&IdsDecomp> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, decomp: IdsDecomp) {
        let key = key.into();
        if self.entries.insert(key.clone(), decomp).is_none() {
            self.order.push(key);
        }
    }
}

/// Parse a whole IDS file.
///
/// Lines that fail the description grammar are collected in
/// [`IdsTable::rejected`]; a top-level numeric escape aborts the whole load.
pub fn parse_ids_file(text: &str) -> Result<IdsTable, IdsFileError> {
    let mut table = IdsTable::default();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim_start_matches('\u{feff}');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.splitn(3, '\t');
        let (Some(_codepoint), Some(character), Some(description)) =
            (fields.next(), fields.next(), fields.next())
        else {
            table.malformed.push(idx);
            continue;
        };
        match parse_ids_sequence(description) {
            Ok(decomp) => table.insert(character, decomp),
            Err(source @ IdsParseError::TopLevelEscape { .. }) => {
                return Err(IdsFileError { line: idx, source })
            }
            Err(err) => table.rejected.push((idx, err)),
        }
    }
    Ok(table)
}
