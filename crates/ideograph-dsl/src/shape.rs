//! Shape vocabulary.
//!
//! A shape token names the geometric relation between a record's components:
//!
//! - `c`, `ck`, `cz`: core components (strokes, katakana, zhuyin); no components
//! - `lock`: two components locked together
//! - `m*`: one component modified in some way (`me` equivalent, `ml` left
//!   radical form, `mo` outline, ...)
//! - `a`, `d`: two or more components flowing across / downwards
//! - `s*`: first component surrounds the second (`str` = around the top right)
//! - `w*`: second component sits within the first (`wbl` = at the bottom left)
//! - `ba`, `bd`: second component between the first, across / downwards
//! - `refh`, `refv`, `rot`, `r*`: reflections, rotations and repeats of one
//!   component (`ra` repeat across, `r3d` three times downwards, ...)
//!
//! `s`, `a`, `d` and `r` shapes may carry a modifier after a slash: `/t`
//! touching, `/m` melded, `/s` snapped, `/o` overlapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Modifier suffix carried after `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    Touch,
    Meld,
    Snap,
    Overlap,
}

impl Modifier {
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "t" => Some(Self::Touch),
            "m" => Some(Self::Meld),
            "s" => Some(Self::Snap),
            "o" => Some(Self::Overlap),
            _ => None,
        }
    }
}

/// Coarse family of a shape, derived from its base token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeFamily {
    Core,
    Lock,
    Modified,
    Across,
    Down,
    Surround,
    Within,
    Between,
    Reflect,
    Repeat,
    Other,
}

/// Number of components a shape expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exactly(k) => n == k,
            Arity::AtLeast(k) => n >= k,
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(k) => write!(f, "exactly {k}"),
            Arity::AtLeast(k) => write!(f, "at least {k}"),
            Arity::Any => write!(f, "any number of"),
        }
    }
}

/// A shape token as it appears in the data (modifier suffix included).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(String);

impl Shape {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The token with any `/modifier` suffix removed (`"a/t"` → `"a"`).
    pub fn base(&self) -> &str {
        clip_shape(&self.0)
    }

    pub fn modifier(&self) -> Option<Modifier> {
        self.0
            .split_once('/')
            .and_then(|(_, suffix)| Modifier::from_suffix(suffix))
    }

    /// `c`, `ck` and `cz`: the shape-less leaves of the graph.
    pub fn is_core(&self) -> bool {
        matches!(self.0.as_str(), "c" | "ck" | "cz")
    }

    pub fn family(&self) -> ShapeFamily {
        let base = self.base();
        match base {
            "c" | "ck" | "cz" => ShapeFamily::Core,
            "lock" => ShapeFamily::Lock,
            "a" => ShapeFamily::Across,
            "d" => ShapeFamily::Down,
            "ba" | "bd" => ShapeFamily::Between,
            "ref" | "refh" | "refv" | "rot" => ShapeFamily::Reflect,
            _ if base.starts_with('m') => ShapeFamily::Modified,
            _ if base.starts_with('s') => ShapeFamily::Surround,
            _ if base.starts_with('w') => ShapeFamily::Within,
            _ if base.starts_with('r') => ShapeFamily::Repeat,
            _ => ShapeFamily::Other,
        }
    }

    pub fn arity(&self) -> Arity {
        match self.family() {
            ShapeFamily::Core => Arity::Exactly(0),
            ShapeFamily::Lock
            | ShapeFamily::Surround
            | ShapeFamily::Within
            | ShapeFamily::Between => Arity::Exactly(2),
            ShapeFamily::Modified | ShapeFamily::Reflect | ShapeFamily::Repeat => {
                Arity::Exactly(1)
            }
            ShapeFamily::Across | ShapeFamily::Down => Arity::AtLeast(2),
            ShapeFamily::Other => Arity::Any,
        }
    }

    /// For an inner-surround (`w*`) shape, the outer-surround shape describing
    /// the same layout once the two components are swapped.
    pub fn surround_equivalent(&self) -> Option<&'static str> {
        match self.base() {
            "w" => Some("s"),
            "wl" => Some("sr"),
            "wt" => Some("sb"),
            "wb" => Some("st"),
            "wr" => Some("sl"),
            "wtl" => Some("sbr"),
            "wtr" => Some("sbl"),
            "wbl" => Some("str"),
            "wbr" => Some("stl"),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Shape {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Shape {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Strip a `/modifier` suffix from a raw shape token.
pub fn clip_shape(token: &str) -> &str {
    token.split_once('/').map(|(base, _)| base).unwrap_or(token)
}

/// Shapes the summary report walks, one row per group.
pub const SHAPE_SUMMARY_ROWS: &[&[&str]] = &[
    &["c", "ck", "cz", "built", "lock"],
    &["m", "me", "msp"],
    &["ms", "mt", "ml", "mr", "mb", "mc", "mtl", "mo", "mo2", "mo4", "mo5"],
    &["a", "a/t", "a/m", "a/s"],
    &["d", "d/t", "d/m", "d/s", "d/o"],
    &["s", "s/t", "st", "st/t", "sl", "sl/m", "sl/s", "sb", "sr"],
    &["stl", "stl/s", "str", "str/o", "sbl", "sbl/m", "sbl/o", "sbr"],
    &["w", "w/t", "w/o", "wc", "wt", "wt/t", "wb", "wl", "wr"],
    &["wtl", "wtr", "wbl", "wbr"],
    &["ba", "ba/o", "bd", "bd/t", "bd/m"],
    &["refh", "refv", "rot"],
    &["ra", "ra/m", "rd", "rd/t", "rd/m", "rd/s"],
    &["rs", "rst", "rsb", "rstl", "rsbr"],
    &["r3tr", "r3gw", "r3a", "r3d", "r3d/m", "r3st", "r3stl", "r3str"],
    &["r4sq", "r4a", "r4d", "r4dia", "r4ref/t", "r5x", "r5p"],
    &["rrefl", "rrefl/m", "rrefr", "rrefr/t", "rrefr/m", "rrefr/o", "rrefd", "rrefd/m"],
    &["rrotr", "rrotu", "rrotd"],
];

/// `true` when the shape appears somewhere in [`SHAPE_SUMMARY_ROWS`].
pub fn is_known_shape(token: &str) -> bool {
    SHAPE_SUMMARY_ROWS.iter().any(|row| row.contains(&token))
}
