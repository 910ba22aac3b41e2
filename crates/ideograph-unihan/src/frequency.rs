//! Usage ranks from `kFrequency` and the GB0 marks.
//!
//! `kFrequency` runs 1 (most common) to 5. Characters without a value rank
//! as 6, and every character that is not simplified is pushed back by 10, so
//! simplified characters always come first.

use ahash::AHashMap;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::fields::{for_each_field, read, UnihanLineError};
use crate::irg::IrgSources;

const UNRANKED: u32 = 6;
const TRADITIONAL_PENALTY: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CharStats {
    /// `kFrequency` value, 0 when absent.
    pub freq: u8,
    pub simplified: bool,
}

impl CharStats {
    pub fn rank(&self) -> u32 {
        let base = match self.freq {
            0 => UNRANKED,
            f => u32::from(f),
        };
        if self.simplified {
            base
        } else {
            base + TRADITIONAL_PENALTY
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Frequencies {
    stats: AHashMap<char, CharStats>,
    pub errors: Vec<(usize, UnihanLineError)>,
}

impl Frequencies {
    /// Combine `kFrequency` lines from the dictionary-like data with the
    /// simplified marks of `irg`.
    pub fn from_text(text: &str, irg: &IrgSources) -> Self {
        let mut stats: AHashMap<char, CharStats> = AHashMap::new();
        let mut errors = for_each_field(text, |line| {
            if line.field != "kFrequency" {
                return;
            }
            match line.value.trim().parse::<u8>() {
                Ok(freq) => stats.entry(line.ch).or_default().freq = freq,
                Err(err) => {
                    tracing::warn!(ch = %line.ch, value = line.value, error = %err, "bad kFrequency value")
                }
            }
        });
        for ch in irg.simplified() {
            stats.entry(ch).or_default().simplified = true;
        }
        errors.extend(irg.errors.iter().cloned());
        tracing::debug!(chars = stats.len(), "frequency data loaded");
        Self { stats, errors }
    }

    pub fn load(dictionary: &Path, irg: &IrgSources) -> Result<Self> {
        Ok(Self::from_text(&read(dictionary)?, irg))
    }

    pub fn stats(&self, ch: char) -> CharStats {
        self.stats.get(&ch).copied().unwrap_or_default()
    }

    pub fn rank(&self, ch: char) -> u32 {
        self.stats(ch).rank()
    }

    /// Stable sort by ascending rank.
    pub fn order(&self, chars: &mut [char]) {
        chars.sort_by_key(|c| self.rank(*c));
    }
}
