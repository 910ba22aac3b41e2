//! Unicode block classification for keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnicodeBlock {
    /// Synthetic keys (leading scalar in the ASCII range).
    Intermediate,
    /// CJK Radicals Supplement.
    Radical,
    Kangxi,
    Katakana,
    Zhuyin,
    Stroke,
    /// Unified ideographs, all extensions and compatibility supplements.
    Unihan,
    /// Ideographic variation items mapped into the supplementary private use area.
    Ivd,
}

const BLOCKS: [(UnicodeBlock, u32, u32); 8] = [
    (UnicodeBlock::Intermediate, 0x20, 0x7f),
    (UnicodeBlock::Radical, 0x2e80, 0x2ef3),
    (UnicodeBlock::Kangxi, 0x2f00, 0x2fd5),
    (UnicodeBlock::Katakana, 0x30a0, 0x30ff),
    (UnicodeBlock::Zhuyin, 0x3105, 0x3129),
    (UnicodeBlock::Stroke, 0x31c0, 0x31e3),
    (UnicodeBlock::Unihan, 0x3400, 0x2fa1d),
    (UnicodeBlock::Ivd, 0x100003, 0x1028f4),
];

/// Order in which tallies and samples are reported.
pub const REPORT_ORDER: [UnicodeBlock; 7] = [
    UnicodeBlock::Stroke,
    UnicodeBlock::Unihan,
    UnicodeBlock::Radical,
    UnicodeBlock::Katakana,
    UnicodeBlock::Zhuyin,
    UnicodeBlock::Intermediate,
    UnicodeBlock::Ivd,
];

/// Unassigned code point inside the radicals supplement.
pub const RADICAL_GAP: u32 = 0x2e9a;

impl UnicodeBlock {
    pub fn name(self) -> &'static str {
        match self {
            UnicodeBlock::Intermediate => "Intermediate",
            UnicodeBlock::Radical => "Radical",
            UnicodeBlock::Kangxi => "Kangxi",
            UnicodeBlock::Katakana => "Katakana",
            UnicodeBlock::Zhuyin => "Zhuyin",
            UnicodeBlock::Stroke => "Stroke",
            UnicodeBlock::Unihan => "Unihan",
            UnicodeBlock::Ivd => "IVD",
        }
    }

    pub fn range(self) -> RangeInclusive<u32> {
        BLOCKS
            .iter()
            .find(|(block, _, _)| *block == self)
            .map(|(_, lo, hi)| *lo..=*hi)
            .unwrap_or(1..=0)
    }

    /// Every assigned scalar of the block, in code point order.
    pub fn scalars(self) -> impl Iterator<Item = char> {
        self.range()
            .filter(move |cp| !(self == UnicodeBlock::Radical && *cp == RADICAL_GAP))
            .filter_map(char::from_u32)
    }
}

impl fmt::Display for UnicodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn classify(c: char) -> Option<UnicodeBlock> {
    let cp = c as u32;
    BLOCKS
        .iter()
        .find(|(_, lo, hi)| (*lo..=*hi).contains(&cp))
        .map(|(block, _, _)| *block)
}

/// Block of a key's leading scalar.
pub fn classify_key(key: &str) -> Option<UnicodeBlock> {
    key.chars().next().and_then(classify)
}
