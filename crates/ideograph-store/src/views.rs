//! Grouping views.
//!
//! Every grouping walks the keys in enumeration order, so groups first appear
//! in the order their first member does; groups are then stably sorted by
//! ascending size. Output is therefore reproducible run to run.

use ahash::AHashMap;
use ideograph_dsl::blocks::{classify_key, UnicodeBlock};
use ideograph_dsl::key::{is_intermediate, key_cmp, sort_keys};
use serde::Serialize;

use crate::store::DecompStore;

/// Keys sharing one grouping value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub key: String,
    pub members: Vec<String>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn group_in_order<'a, I, F>(keys: I, mut group_of: F) -> Vec<Group>
where
    I: IntoIterator<Item = &'a str>,
    F: FnMut(&'a str) -> Option<String>,
{
    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    for key in keys {
        let Some(value) = group_of(key) else {
            continue;
        };
        let slot = *index.entry(value.clone()).or_insert_with(|| {
            groups.push(Group {
                key: value,
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(key.to_string());
    }
    groups.sort_by_key(Group::len);
    groups
}

/// Placement of a radical-supplement character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RadicalBucket {
    /// No owners, shape `me`.
    UnownedEquivalent,
    /// No owners, some other `m*` shape.
    UnownedModified,
    /// No owners, any other shape.
    Unowned,
    /// Owned, `m*` shape.
    OwnedModified,
    /// Owned, any other shape.
    Owned,
}

impl RadicalBucket {
    pub const ALL: [RadicalBucket; 5] = [
        RadicalBucket::UnownedEquivalent,
        RadicalBucket::UnownedModified,
        RadicalBucket::Unowned,
        RadicalBucket::OwnedModified,
        RadicalBucket::Owned,
    ];

    pub fn header(self) -> &'static str {
        match self {
            RadicalBucket::UnownedEquivalent => "No owners, me...",
            RadicalBucket::UnownedModified => "No owners, other m...",
            RadicalBucket::Unowned => "No owners, not m...",
            RadicalBucket::OwnedModified => "Have owners, various m...",
            RadicalBucket::Owned => "Have owners, not m...",
        }
    }
}

/// Key counts per block plus counts of (key block, component block) pairs.
#[derive(Debug, Clone, Default)]
pub struct BlockTallies {
    keys: AHashMap<Option<UnicodeBlock>, usize>,
    pairs: AHashMap<(Option<UnicodeBlock>, Option<UnicodeBlock>), usize>,
    /// Keys and components that fall in no known block.
    pub unclassified: Vec<String>,
}

impl BlockTallies {
    pub fn keys_in(&self, block: UnicodeBlock) -> usize {
        self.keys.get(&Some(block)).copied().unwrap_or(0)
    }

    pub fn pair(&self, key_block: UnicodeBlock, comp_block: UnicodeBlock) -> usize {
        self.pairs
            .get(&(Some(key_block), Some(comp_block)))
            .copied()
            .unwrap_or(0)
    }
}

impl DecompStore {
    /// Keys grouped by exact shape token.
    pub fn shape_groups(&self) -> Vec<Group> {
        group_in_order(self.unique_keys(), |key| {
            self.record(key).map(|rec| rec.shape.as_str().to_string())
        })
    }

    /// Keys grouped by first component (leaves group under `""`).
    pub fn leader_groups(&self) -> Vec<Group> {
        group_in_order(self.unique_keys(), |key| {
            Some(self.components(key).first().cloned().unwrap_or_default())
        })
    }

    /// Keys grouped by flattened signature.
    pub fn flatten_groups(&self) -> Vec<Group> {
        group_in_order(self.unique_keys(), |key| Some(self.flattened_signature(key)))
    }

    /// Keys grouped by decomposition tag.
    pub fn tag_groups(&self) -> Vec<Group> {
        group_in_order(self.unique_keys(), |key| Some(self.decomp_tag(key)))
    }

    /// Keys grouped by canonical form: clipped shape plus components, with
    /// inner-surround shapes rewritten as the equivalent outer surround and
    /// their two components swapped. Core shapes are skipped. Members are in
    /// domain order.
    pub fn form_groups(&self) -> Vec<Group> {
        let mut groups = group_in_order(self.unique_keys(), |key| {
            let rec = self.record(key)?;
            if rec.shape.is_core() {
                return None;
            }
            if rec.shape.is_empty() {
                tracing::warn!(key = %key, "illegal empty shape");
            }
            let form = match (rec.shape.surround_equivalent(), rec.components.as_slice()) {
                (Some(outer), [first, second]) => format!("{outer}({second},{first})"),
                _ => format!("{}({})", rec.shape.base(), rec.components.join(",")),
            };
            Some(form)
        });
        for group in &mut groups {
            sort_keys(&mut group.members);
        }
        groups
    }

    /// Intermediate keys ordered by owner count, then by first owner.
    pub fn intermediates_by_owners(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.unique_keys().into_iter().filter(|k| is_intermediate(k)).collect();
        keys.sort_by(|a, b| {
            let (oa, ob) = (self.owners(a), self.owners(b));
            oa.len().cmp(&ob.len()).then_with(|| match (oa.first(), ob.first()) {
                (Some(x), Some(y)) => key_cmp(x, y),
                (x, y) => x.is_some().cmp(&y.is_some()),
            })
        });
        keys
    }

    /// Keys whose shape is exactly `shape`, in enumeration order.
    pub fn keys_with_shape(&self, shape: &str) -> Vec<&str> {
        self.keys()
            .filter(|key| self.record(key).is_some_and(|rec| rec.shape.as_str() == shape))
            .collect()
    }

    /// Every radical-supplement scalar with its bucket.
    pub fn radical_buckets(&self) -> Vec<(String, RadicalBucket)> {
        UnicodeBlock::Radical
            .scalars()
            .map(|c| {
                let key = c.to_string();
                let owned = !self.owners(&key).is_empty();
                let shape = self.record(&key).map(|rec| rec.shape.as_str()).unwrap_or("");
                let bucket = match (owned, shape) {
                    (false, "me") => RadicalBucket::UnownedEquivalent,
                    (false, s) if s.starts_with('m') => RadicalBucket::UnownedModified,
                    (false, _) => RadicalBucket::Unowned,
                    (true, s) if s.starts_with('m') => RadicalBucket::OwnedModified,
                    (true, _) => RadicalBucket::Owned,
                };
                (key, bucket)
            })
            .collect()
    }

    /// Per-block tallies over the enumeration sequence.
    pub fn block_tallies(&self) -> BlockTallies {
        let mut tallies = BlockTallies::default();
        for key in self.keys() {
            let block = classify_key(key);
            if block.is_none() {
                tallies.unclassified.push(key.to_string());
            }
            *tallies.keys.entry(block).or_default() += 1;
            for comp in self.components(key) {
                let comp_block = classify_key(comp);
                if comp_block.is_none() {
                    tallies.unclassified.push(comp.clone());
                }
                *tallies.pairs.entry((block, comp_block)).or_default() += 1;
            }
        }
        tallies
    }
}
