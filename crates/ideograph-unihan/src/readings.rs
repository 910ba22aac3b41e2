//! Mandarin readings (`kMandarin`) and syllable structure.
//!
//! A pinyin syllable splits into an initial (`-` when it starts with a
//! vowel), a final with tone marks removed, and a tone 1–5 (5 = neutral):
//!
//! ```text
//! zhōng  → zh, ong, 1
//! ǎi     → -, ai, 3
//! lǜ     → l, v, 4
//! ń      → n, -, 2
//! ```

use ahash::AHashMap;
use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::fields::{for_each_field, read, UnihanLineError};

const INITIALS: &[&str] = &[
    "-", "w", "y", "b", "p", "m", "f", "d", "t", "g", "k", "h", "j", "q", "x", "zh", "ch", "sh",
    "z", "c", "s", "n", "l", "r",
];

const FINALS: &[&str] = &[
    "an", "ang", "en", "eng", "ong", "in", "ing", "ian", "iang", "iong", "un", "ung", "uan",
    "uang", "vn", "van", "a", "e", "ai", "ei", "ao", "ou", "r", "i", "ai", "iao", "ie", "iu", "u",
    "ua", "o", "uo", "uai", "ui", "v", "ve", "-",
];

/// Position of an initial in the ordering table; unknown initials sort last.
pub fn initial_index(initial: &str) -> usize {
    INITIALS
        .iter()
        .position(|i| *i == initial)
        .unwrap_or(INITIALS.len() + 1)
}

/// Position of a final in the ordering table; unknown finals sort last.
pub fn final_index(rime: &str) -> usize {
    FINALS
        .iter()
        .position(|f| *f == rime)
        .unwrap_or(FINALS.len() + 1)
}

/// Base letter and tone of a tone-marked letter.
fn toned_letter(c: char) -> Option<(char, u8)> {
    Some(match c {
        'ā' => ('a', 1),
        'ē' => ('e', 1),
        'ī' => ('i', 1),
        'ō' => ('o', 1),
        'ū' => ('u', 1),
        'á' => ('a', 2),
        'é' => ('e', 2),
        'í' => ('i', 2),
        'ó' => ('o', 2),
        'ú' => ('u', 2),
        'ǘ' => ('v', 2),
        'ḿ' | 'ń' => ('-', 2),
        'ǎ' => ('a', 3),
        'ě' => ('e', 3),
        'ǐ' => ('i', 3),
        'ǒ' => ('o', 3),
        'ǔ' => ('u', 3),
        'ǚ' => ('v', 3),
        'ň' => ('-', 3),
        'à' => ('a', 4),
        'è' => ('e', 4),
        'ì' => ('i', 4),
        'ò' => ('o', 4),
        'ù' => ('u', 4),
        'ǜ' => ('v', 4),
        'ǹ' => ('-', 4),
        _ => return None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SyllableParts {
    pub initial: String,
    pub rime: String,
    pub tone: u8,
}

impl SyllableParts {
    fn new(initial: &str, rime: &str, tone: u8) -> Self {
        Self {
            initial: initial.to_string(),
            rime: rime.to_string(),
            tone,
        }
    }
}

impl fmt::Display for SyllableParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.initial, self.rime, self.tone)
    }
}

/// Split the first syllable of a reading.
pub fn split_syllable(reading: &str) -> SyllableParts {
    let syl = reading.split(' ').next().unwrap_or_default();
    let mut chars = syl.chars();
    let Some(first) = chars.next() else {
        return SyllableParts::new("-", "", 5);
    };

    let (initial, rest) = match first {
        'c' | 's' | 'z' => {
            let after = chars.as_str();
            match after.strip_prefix('h') {
                Some(rest) => (format!("{first}h"), rest),
                None => (first.to_string(), after),
            }
        }
        'n' if chars.as_str().is_empty() => return SyllableParts::new("n", "-", 5),
        'w' | 'y' | 'b' | 'p' | 'm' | 'f' | 'd' | 't' | 'g' | 'k' | 'h' | 'j' | 'q' | 'x' | 'n'
        | 'l' | 'r' => (first.to_string(), chars.as_str()),
        'ḿ' | 'ń' | 'ň' | 'ǹ' => {
            let initial = if first == 'ḿ' { "m" } else { "n" };
            let tone = toned_letter(first).map(|(_, t)| t).unwrap_or(5);
            return SyllableParts::new(initial, "-", tone);
        }
        _ => ("-".to_string(), syl),
    };

    let mut rime = String::with_capacity(rest.len());
    let mut tone = 5;
    for c in rest.chars() {
        match toned_letter(c) {
            Some((base, t)) => {
                rime.push(base);
                tone = t;
            }
            None => rime.push(c),
        }
    }
    SyllableParts {
        initial,
        rime,
        tone,
    }
}

/// Characters read with one syllable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyllableEntry {
    pub syllable: String,
    pub parts: SyllableParts,
    /// Characters whose first reading is this syllable.
    pub chars: Vec<char>,
    /// Characters with this syllable as a secondary reading.
    pub others: Vec<char>,
}

#[derive(Debug, Clone, Default)]
pub struct SyllableTable {
    entries: Vec<SyllableEntry>,
    pub errors: Vec<(usize, UnihanLineError)>,
}

impl SyllableTable {
    /// Build from `kMandarin` lines and order the syllables.
    pub fn from_text(text: &str) -> Self {
        let mut index: AHashMap<String, usize> = AHashMap::new();
        let mut entries: Vec<SyllableEntry> = Vec::new();
        let mut slot = |syl: &str| -> usize {
            *index.entry(syl.to_string()).or_insert_with(|| {
                entries.push(SyllableEntry {
                    syllable: syl.to_string(),
                    parts: split_syllable(syl),
                    chars: Vec::new(),
                    others: Vec::new(),
                });
                entries.len() - 1
            })
        };

        let mut placements: Vec<(usize, char, bool)> = Vec::new();
        let errors = for_each_field(text, |line| {
            if line.field != "kMandarin" {
                return;
            }
            for (n, syl) in line.value.split(' ').filter(|s| !s.is_empty()).enumerate() {
                placements.push((slot(syl), line.ch, n == 0));
            }
        });
        for (i, ch, primary) in placements {
            if primary {
                entries[i].chars.push(ch);
            } else {
                entries[i].others.push(ch);
            }
        }

        entries.sort_by(|a, b| {
            initial_index(&b.parts.initial)
                .cmp(&initial_index(&a.parts.initial))
                .then_with(|| final_index(&b.parts.rime).cmp(&final_index(&a.parts.rime)))
                .then_with(|| b.parts.tone.cmp(&a.parts.tone))
        });
        Self { entries, errors }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_text(&read(path)?))
    }

    pub fn entries(&self) -> &[SyllableEntry] {
        &self.entries
    }

    pub fn get(&self, syllable: &str) -> Option<&SyllableEntry> {
        self.entries.iter().find(|e| e.syllable == syllable)
    }
}
