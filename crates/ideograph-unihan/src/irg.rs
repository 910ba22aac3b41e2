//! IRG sources: core-set priorities and GB0 (simplified) marks.
//!
//! `kIICore` values are a priority letter followed by source letters
//! (`AGTJ` = priority A, sources G, T and J). A `kIRG_GSource` value starting
//! with `G0-` marks a GB 2312 character, which is taken as simplified.

use ahash::AHashSet;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::fields::{for_each_field, read, UnihanLineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Priority {
    A,
    B,
    C,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::A, Priority::B, Priority::C];

    fn from_letter(c: char) -> Option<Self> {
        match c {
            'A' => Some(Priority::A),
            'B' => Some(Priority::B),
            'C' => Some(Priority::C),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Priority::A => "A",
            Priority::B => "B",
            Priority::C => "C",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreChar {
    pub ch: char,
    pub priority: Priority,
    /// Source letters, drawn from `GHJKMPT`.
    pub sources: String,
}

#[derive(Debug, Clone, Default)]
pub struct IrgSources {
    core: BTreeMap<char, CoreChar>,
    gb0: AHashSet<char>,
    /// Line counts of every field other than `kIICore`.
    pub field_totals: BTreeMap<String, usize>,
    pub errors: Vec<(usize, UnihanLineError)>,
}

impl IrgSources {
    pub fn from_text(text: &str) -> Self {
        let mut out = IrgSources::default();
        let errors = for_each_field(text, |line| match line.field {
            "kIICore" => {
                let mut letters = line.value.chars();
                match letters.next().and_then(Priority::from_letter) {
                    Some(priority) => {
                        out.core.insert(
                            line.ch,
                            CoreChar {
                                ch: line.ch,
                                priority,
                                sources: letters.as_str().to_string(),
                            },
                        );
                    }
                    None => tracing::warn!(ch = %line.ch, value = line.value, "unknown kIICore priority"),
                }
            }
            field => {
                if field == "kIRG_GSource" && line.value.len() > 3 && line.value.starts_with("G0-") {
                    out.gb0.insert(line.ch);
                }
                *out.field_totals.entry(field.to_string()).or_default() += 1;
            }
        });
        out.errors = errors;
        for (field, count) in &out.field_totals {
            tracing::debug!(field = %field, count, "IRG field tally");
        }
        out
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_text(&read(path)?))
    }

    /// Core characters of one priority, in code point order.
    pub fn by_priority(&self, priority: Priority) -> impl Iterator<Item = &CoreChar> {
        self.core.values().filter(move |c| c.priority == priority)
    }

    pub fn core(&self, ch: char) -> Option<&CoreChar> {
        self.core.get(&ch)
    }

    pub fn core_len(&self) -> usize {
        self.core.len()
    }

    /// `true` for characters with a `G0-` source.
    pub fn is_simplified(&self, ch: char) -> bool {
        self.gb0.contains(&ch)
    }

    pub fn simplified(&self) -> impl Iterator<Item = char> + '_ {
        self.gb0.iter().copied()
    }
}
