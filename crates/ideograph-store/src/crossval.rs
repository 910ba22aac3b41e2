//! Cross-checks against external IDS data.
//!
//! - *longs*: records with more than two components, beside their IDS
//! - *shorts*: two-component records whose IDS operands are plain
//!   characters that differ from the record's components
//! - *merges*: intermediates whose position in a record lines up with a plain
//!   IDS character, suggesting the intermediate is that character

use ahash::AHashSet;
use ideograph_dsl::ids::{is_structural, IdsDecomp, IdsKind, IdsTable};
use ideograph_dsl::key::is_intermediate;
use serde::Serialize;
use std::fmt;

use crate::store::DecompStore;

/// One record printed next to its IDS description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdsComparison {
    pub key: String,
    pub shape: String,
    pub components: Vec<String>,
    pub ids: Option<IdsDecomp>,
}

impl IdsComparison {
    fn new(store: &DecompStore, key: &str, ids: &IdsTable) -> Option<Self> {
        let record = store.record(key)?;
        Some(Self {
            key: key.to_string(),
            shape: record.shape.as_str().to_string(),
            components: record.components.clone(),
            ids: ids.get(key).cloned(),
        })
    }
}

impl fmt::Display for IdsComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}({})...", self.key, self.shape, self.components.join(","))?;
        match &self.ids {
            Some(ids) => write!(f, "{}({})", ids.shape().unwrap_or(""), ids.components.join(",")),
            None => f.write_str("()"),
        }
    }
}

/// Comparisons bucketed by `shape:count`, buckets in lexical order.
pub type ComparisonBuckets = Vec<(String, Vec<IdsComparison>)>;

fn bucket(mut buckets: ComparisonBuckets) -> ComparisonBuckets {
    buckets.sort_by(|a, b| a.0.cmp(&b.0));
    buckets
}

fn push(buckets: &mut ComparisonBuckets, label: String, item: Option<IdsComparison>) {
    let slot = match buckets.iter().position(|(l, _)| *l == label) {
        Some(i) => i,
        None => {
            buckets.push((label, Vec::new()));
            buckets.len() - 1
        }
    };
    if let Some(item) = item {
        buckets[slot].1.push(item);
    }
}

/// Suggested merge of an intermediate into a real character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeSuggestion {
    /// The IDS character the intermediate lines up with.
    pub target: String,
    pub intermediate: String,
    pub evidence: IdsComparison,
}

impl fmt::Display for MergeSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "merge {} {} //{}", self.target, self.intermediate, self.evidence)
    }
}

/// Whether the IDS entry has a shape worth comparing (composed or unknown).
fn comparable(ids: &IdsDecomp) -> bool {
    !matches!(ids.kind, IdsKind::Single(_) | IdsKind::Alternatives)
}

impl DecompStore {
    /// Records with more than two components.
    pub fn ids_longs(&self, ids: &IdsTable) -> ComparisonBuckets {
        let mut buckets = ComparisonBuckets::new();
        for key in self.unique_keys() {
            let Some(record) = self.record(key) else {
                continue;
            };
            if record.components.len() > 2 {
                let label = format!("{}:{}", record.shape, record.components.len());
                push(&mut buckets, label, IdsComparison::new(self, key, ids));
            }
        }
        bucket(buckets)
    }

    /// Two-component records whose IDS disagrees on plain operands.
    pub fn ids_shorts(&self, ids: &IdsTable) -> ComparisonBuckets {
        let mut buckets = ComparisonBuckets::new();
        for key in self.unique_keys() {
            let Some(record) = self.record(key) else {
                continue;
            };
            if record.components.len() != 2 {
                continue;
            }
            let label = format!("{}:2", record.shape);
            let item = ids
                .get(key)
                .filter(|d| comparable(d))
                .filter(|d| !d.components.iter().any(|c| is_structural(c)))
                .filter(|d| d.components != record.components)
                .and_then(|_| IdsComparison::new(self, key, ids));
            push(&mut buckets, label, item);
        }
        bucket(buckets)
    }

    /// For each record whose component count matches its composed IDS, the
    /// first intermediate component paired with the IDS operand in the same
    /// position, when that operand is a plain character. Each intermediate is
    /// suggested at most once.
    pub fn ids_merges(&self, ids: &IdsTable) -> Vec<MergeSuggestion> {
        let mut seen = AHashSet::new();
        let mut out = Vec::new();
        for key in self.unique_keys() {
            let (Some(record), Some(decomp)) = (self.record(key), ids.get(key)) else {
                continue;
            };
            if !comparable(decomp) || decomp.components.len() != record.components.len() {
                continue;
            }
            let Some((idx, interm)) = record
                .components
                .iter()
                .enumerate()
                .find(|(_, c)| is_intermediate(c))
            else {
                continue;
            };
            if !seen.insert(interm.clone()) {
                continue;
            }
            let target = &decomp.components[idx];
            if is_structural(target) {
                continue;
            }
            if let Some(evidence) = IdsComparison::new(self, key, ids) {
                out.push(MergeSuggestion {
                    target: target.clone(),
                    intermediate: interm.clone(),
                    evidence,
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideograph_dsl::ids::parse_ids_file;

    fn fixture() -> (DecompStore, IdsTable) {
        let (store, _) = DecompStore::from_text(
            "一:c()\n丨:c()\n木:c()\n川:a(丨,丨,丨)\n林:a(木,木)\n杆:a(木,干)\n干:d(一,十)\n十:lock(一,丨)\n30:a(木,一)\n相:a(30,目)\n目:c()\n",
            None,
        );
        let ids = parse_ids_file(
            "U+5DDD\t川\t⿲丿丨丨\nU+6797\t林\t⿰木木\nU+6746\t杆\t⿰木于\nU+5E72\t干\t⿱一⿻一丨\nU+76F8\t相\t⿰木目\n",
        )
        .unwrap();
        (store, ids)
    }

    #[test]
    fn longs_bucket_by_shape_and_count() {
        let (store, ids) = fixture();
        let longs = store.ids_longs(&ids);
        assert_eq!(longs.len(), 1);
        assert_eq!(longs[0].0, "a:3");
        assert_eq!(longs[0].1[0].to_string(), "川:a(丨,丨,丨)...a(丿,丨,丨)");
    }

    #[test]
    fn shorts_report_plain_disagreements_only() {
        let (store, ids) = fixture();
        let shorts = store.ids_shorts(&ids);
        let all: Vec<String> = shorts
            .iter()
            .flat_map(|(_, items)| items.iter().map(|i| i.to_string()))
            .collect();
        assert_eq!(all, vec!["杆:a(木,干)...a(木,于)", "相:a(30,目)...a(木,目)"]);
        assert!(shorts.iter().any(|(label, items)| label == "d:2" && items.is_empty()));
    }

    #[test]
    fn merges_line_up_intermediates_with_characters() {
        let (store, ids) = fixture();
        let merges = store.ids_merges(&ids);
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].to_string(), "merge 木 30 //相:a(30,目)...a(木,目)");
    }
}
