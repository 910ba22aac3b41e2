//! Unnesting of nested decompositions.
//!
//! New data is often typed with nested expressions, in ASCII or fullwidth
//! punctuation:
//!
//! ```text
//! 𫣂:a(亻,d(w(乃,又),皿))
//! 𬺚:sbl(d（立，电），m（青）)
//! ```
//!
//! Each nested expression is hoisted into its own record under a fresh numeric
//! intermediate key, innermost first, and replaced by that key in its parent:
//!
//! ```text
//! 51:w(乃,又)
//! 52:d(51,皿)
//! 𫣂:a(亻,52)
//! ```

use nom::{
    branch::alt,
    bytes::complete::take_till1,
    character::complete::char as pchar,
    combinator::opt,
    error::{ErrorKind, ParseError},
    multi::separated_list1,
    IResult,
};
use thiserror::Error;

const MAX_NESTING: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnnestError {
    #[error("line does not start with a key")]
    MissingKey,
    #[error("expected `:` after key `{key}`")]
    MissingColon { key: String },
    #[error("expected a shape before `(`")]
    MissingShape,
    #[error("expected `(` after shape `{shape}`")]
    MissingOpenParen { shape: String },
    #[error("expected a component after `,` or `(`")]
    MissingItem,
    #[error("unterminated component list for shape `{shape}`")]
    Unterminated { shape: String },
    #[error("unexpected `{found}` after component `{item}`")]
    UnexpectedToken { item: String, found: String },
    #[error("nesting deeper than {MAX_NESTING} levels")]
    TooDeep,
}

/// Result of unnesting one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unnested {
    pub key: String,
    /// Hoisted records followed by the rewritten original, in output order.
    pub lines: Vec<String>,
    /// The next unused intermediate number.
    pub next: u64,
}

// ============================================================================
// Grammar
// ============================================================================

/// Parser error: a plain mismatch (lets `alt`/`opt` backtrack) or a
/// diagnosed failure.
#[derive(Debug)]
enum LineError {
    Mismatch,
    Diagnosed(UnnestError),
}

impl<'a> ParseError<&'a str> for LineError {
    fn from_error_kind(_: &'a str, _: ErrorKind) -> Self {
        LineError::Mismatch
    }

    fn append(_: &'a str, _: ErrorKind, other: Self) -> Self {
        other
    }
}

type Res<'a, T> = IResult<&'a str, T, LineError>;

fn fail<'a, T>(err: UnnestError) -> Res<'a, T> {
    Err(nom::Err::Failure(LineError::Diagnosed(err)))
}

/// Turn a mismatch of `res` into the failure `err`.
fn or_fail<'a, T>(res: Res<'a, T>, err: impl FnOnce() -> UnnestError) -> Res<'a, T> {
    res.map_err(|e| match e {
        nom::Err::Error(LineError::Mismatch) => nom::Err::Failure(LineError::Diagnosed(err())),
        other => other,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node<'a> {
    Leaf(&'a str),
    Expr { shape: &'a str, items: Vec<Node<'a>> },
}

impl Node<'_> {
    fn name(&self) -> &str {
        match self {
            Node::Leaf(name) => name,
            Node::Expr { shape, .. } => shape,
        }
    }
}

fn is_punct(c: char) -> bool {
    matches!(c, '(' | ')' | ':' | ',' | '（' | '）' | '：' | '，')
}

fn word(input: &str) -> Res<'_, &str> {
    take_till1(is_punct)(input)
}

fn open(input: &str) -> Res<'_, char> {
    alt((pchar('('), pchar('（')))(input)
}

fn close(input: &str) -> Res<'_, char> {
    alt((pchar(')'), pchar('）')))(input)
}

fn comma(input: &str) -> Res<'_, char> {
    alt((pchar(','), pchar('，')))(input)
}

fn colon(input: &str) -> Res<'_, char> {
    alt((pchar(':'), pchar('：')))(input)
}

/// A component: a plain item, or `shape(...)` when a list follows.
fn node(input: &str, depth: usize) -> Res<'_, Node<'_>> {
    let (input, name) = or_fail(word(input), || UnnestError::MissingItem)?;
    let (input, opened) = opt(open)(input)?;
    if opened.is_none() {
        return Ok((input, Node::Leaf(name)));
    }
    let (input, items) = list(input, name, depth + 1)?;
    Ok((input, Node::Expr { shape: name, items }))
}

/// The items after `(`, up to and including the closing parenthesis.
fn list<'a>(input: &'a str, shape: &str, depth: usize) -> Res<'a, Vec<Node<'a>>> {
    if depth > MAX_NESTING {
        return fail(UnnestError::TooDeep);
    }
    if let (input, Some(_)) = opt(close)(input)? {
        return Ok((input, Vec::new()));
    }
    let (input, items) = separated_list1(comma, |i| node(i, depth))(input)?;
    match close(input) {
        Ok((input, _)) => Ok((input, items)),
        Err(_) if input.is_empty() => fail(UnnestError::Unterminated {
            shape: shape.to_string(),
        }),
        Err(_) => fail(UnnestError::UnexpectedToken {
            item: items.last().map(|n| n.name().to_string()).unwrap_or_default(),
            found: input.chars().take(1).collect(),
        }),
    }
}

/// `KEY:shape(...)`; whatever follows the body is the comment.
fn statement(input: &str) -> Res<'_, (&str, &str, Vec<Node<'_>>)> {
    let (input, key) = or_fail(word(input), || UnnestError::MissingKey)?;
    let (input, _) = or_fail(colon(input), || UnnestError::MissingColon {
        key: key.to_string(),
    })?;
    let (input, shape) = or_fail(word(input), || UnnestError::MissingShape)?;
    let (input, _) = or_fail(open(input), || UnnestError::MissingOpenParen {
        shape: shape.to_string(),
    })?;
    let (input, items) = list(input, shape, 0)?;
    Ok((input, (key, shape, items)))
}

// ============================================================================
// Hoisting
// ============================================================================

struct Hoister {
    next: u64,
    lines: Vec<String>,
}

impl Hoister {
    /// Render `shape(items)`, hoisting every nested expression first.
    fn render(&mut self, shape: &str, items: &[Node<'_>]) -> String {
        let parts: Vec<String> = items
            .iter()
            .map(|item| match item {
                Node::Leaf(name) => name.to_string(),
                Node::Expr { shape, items } => {
                    let body = self.render(shape, items);
                    let id = self.next;
                    self.next += 1;
                    self.lines.push(format!("{id}:{body}"));
                    id.to_string()
                }
            })
            .collect();
        format!("{shape}({})", parts.join(","))
    }
}

/// Unnest one record line, numbering new intermediates from `start`.
pub fn unnest_line(line: &str, start: u64) -> Result<Unnested, UnnestError> {
    let (comment, (key, shape, items)) = match statement(line) {
        Ok(parsed) => parsed,
        Err(nom::Err::Error(LineError::Diagnosed(err)))
        | Err(nom::Err::Failure(LineError::Diagnosed(err))) => return Err(err),
        Err(_) => return Err(UnnestError::MissingKey),
    };
    let mut hoister = Hoister {
        next: start,
        lines: Vec::new(),
    };
    let rewritten = hoister.render(shape, &items);
    hoister.lines.push(format!("{key}:{rewritten}{comment}"));
    Ok(Unnested {
        key: key.to_string(),
        lines: hoister.lines,
        next: hoister.next,
    })
}

/// Unnesting of a whole file.
#[derive(Debug, Clone, Default)]
pub struct UnnestedText {
    pub lines: Vec<String>,
    pub next: u64,
    /// `(zero-based line index, error)`; failing lines are copied through.
    pub errors: Vec<(usize, UnnestError)>,
    /// Keys of every statement line seen.
    pub keys: Vec<String>,
}

/// Unnest every record in `text`. Blank lines are dropped; comment (`#`) and
/// byte-order-mark lines are copied through untouched.
pub fn unnest_text(text: &str, start: u64) -> UnnestedText {
    let mut out = UnnestedText {
        next: start,
        ..Default::default()
    };
    for (idx, raw) in text.split('\n').enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') || line.starts_with('\u{feff}') {
            out.lines.push(line.to_string());
            continue;
        }
        match unnest_line(line, out.next) {
            Ok(unnested) => {
                out.keys.push(unnested.key);
                out.next = unnested.next;
                out.lines.extend(unnested.lines);
            }
            Err(err) => {
                out.errors.push((idx, err));
                out.lines.push(line.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(line: &str, start: u64) -> (String, u64) {
        let u = unnest_line(line, start).unwrap();
        (u.lines.join("\n"), u.next)
    }

    #[test]
    fn flat_records_pass_through() {
        assert_eq!(ok("ab:c(def,gh)", 51), ("ab:c(def,gh)".to_string(), 51));
        assert_eq!(ok("ab:c()", 51), ("ab:c()".to_string(), 51));
    }

    #[test]
    fn nested_expressions_are_hoisted_innermost_first() {
        assert_eq!(
            ok("𫣂:a(亻,d(w(乃,又),皿))", 51),
            ("51:w(乃,又)\n52:d(51,皿)\n𫣂:a(亻,52)".to_string(), 53)
        );
    }

    #[test]
    fn fullwidth_punctuation_is_accepted() {
        assert_eq!(
            ok("𬺚:sbl(d（立，电），m（青）)", 51),
            ("51:d(立,电)\n52:m(青)\n𬺚:sbl(51,52)".to_string(), 53)
        );
    }

    #[test]
    fn empty_nested_list_is_hoisted_as_is() {
        assert_eq!(ok("ab:c(def,gh())", 51), ("51:gh()\nab:c(def,51)".to_string(), 52));
    }

    #[test]
    fn trailing_text_is_kept_as_comment() {
        assert_eq!(ok("ab:a(x,y) note", 7), ("ab:a(x,y) note".to_string(), 7));
        assert_eq!(ok("ab:a(x,y)(z)", 7), ("ab:a(x,y)(z)".to_string(), 7));
    }

    #[test]
    fn comment_punctuation_is_copied_verbatim() {
        assert_eq!(ok("ab:a(x,y)，note", 7), ("ab:a(x,y)，note".to_string(), 7));
        assert_eq!(
            ok("ab：a（x，d（y，z））：see", 7),
            ("7:d(y,z)\nab:a(x,7)：see".to_string(), 8)
        );
    }

    #[test]
    fn stray_punctuation_inside_a_list_is_reported() {
        assert_eq!(
            unnest_line("ab:a(x：y)", 7),
            Err(UnnestError::UnexpectedToken {
                item: "x".to_string(),
                found: "：".to_string()
            })
        );
        assert_eq!(
            unnest_line("ab:a(d(x)(y))", 7),
            Err(UnnestError::UnexpectedToken {
                item: "d".to_string(),
                found: "(".to_string()
            })
        );
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let deep = format!("ab:{}x{}", "a(".repeat(MAX_NESTING + 2), ")".repeat(MAX_NESTING + 2));
        assert_eq!(unnest_line(&deep, 1), Err(UnnestError::TooDeep));
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(unnest_line("ab:c(,gh)", 51), Err(UnnestError::MissingItem));
        assert_eq!(unnest_line("ab:c(def,)", 51), Err(UnnestError::MissingItem));
        assert_eq!(
            unnest_line("ab c()", 51),
            Err(UnnestError::MissingColon {
                key: "ab c".to_string()
            })
        );
        assert!(matches!(
            unnest_line("ab:c(def", 51),
            Err(UnnestError::Unterminated { .. })
        ));
        assert_eq!(unnest_line("", 51), Err(UnnestError::MissingKey));
        assert_eq!(unnest_line("ab:(x)", 51), Err(UnnestError::MissingShape));
        assert_eq!(
            unnest_line("ab:c", 51),
            Err(UnnestError::MissingOpenParen {
                shape: "c".to_string()
            })
        );
    }

    #[test]
    fn text_threads_the_counter_and_keeps_failures() {
        let out = unnest_text("# header\nx:a(d(p,q),r)\nbad\ny:d(s(m,n),o)\n", 10);
        assert_eq!(
            out.lines,
            vec!["# header", "10:d(p,q)", "x:a(10,r)", "bad", "11:s(m,n)", "y:d(11,o)"]
        );
        assert_eq!(out.next, 12);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.keys, vec!["x", "y"]);
    }
}
