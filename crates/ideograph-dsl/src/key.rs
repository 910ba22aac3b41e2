//! Character keys and the domain ordering.
//!
//! A key is either a single scalar (a real character, radical, stroke, ...)
//! or a synthetic *intermediate* made of ASCII digits. The domain ordering puts
//! every intermediate first, ordered by numeric value, followed by every other
//! key ordered by its leading code point.

use std::cmp::Ordering;

/// `true` when `key` names a synthetic intermediate node.
///
/// Intermediates are recognised by their leading scalar falling in the ASCII
/// range; in practice they are decimal-digit strings such as `"37650"`.
pub fn is_intermediate(key: &str) -> bool {
    matches!(key.chars().next(), Some(c) if c.is_ascii())
}

/// Numeric value of an intermediate key (`0` when it is not a number).
pub fn numeric_value(key: &str) -> u64 {
    key.parse::<u64>().unwrap_or(0)
}

/// Domain ordering over keys.
///
/// `"2" < "10" < "乃"`: intermediates compare numerically and precede all
/// other keys; other keys compare by leading code point, then by full text so
/// the order stays total.
pub fn key_cmp(a: &str, b: &str) -> Ordering {
    match (is_intermediate(a), is_intermediate(b)) {
        (true, true) => numeric_value(a)
            .cmp(&numeric_value(b))
            .then_with(|| a.cmp(b)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a
            .chars()
            .next()
            .cmp(&b.chars().next())
            .then_with(|| a.cmp(b)),
    }
}

/// Sort keys in place by the domain ordering.
pub fn sort_keys<S: AsRef<str>>(keys: &mut [S]) {
    keys.sort_by(|a, b| key_cmp(a.as_ref(), b.as_ref()));
}

/// The leading scalar of a key, if any.
pub fn first_scalar(key: &str) -> Option<char> {
    key.chars().next()
}
