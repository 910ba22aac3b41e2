//! Ownership resolution.
//!
//! Owner lists are always recomputed from scratch:
//!
//! 1. clear every owner list
//! 2. for each record, append its key to the owner list of every component
//!    (components missing from the store are reported, never created)
//! 3. sort each owner list by the domain ordering
//!
//! Intermediates that end up with no owner are then removed together with
//! their records, and the whole computation is repeated until a pass removes
//! nothing. Removal builds a fresh map and sequence which replace the old ones
//! in one step.

use ahash::{AHashMap, AHashSet};
use ideograph_dsl::key::{is_intermediate, key_cmp};
use serde::Serialize;

use crate::store::DecompStore;

/// Outcome of [`DecompStore::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    /// Owner computations performed (at least one).
    pub passes: usize,
    /// Ownerless intermediates removed, in removal order.
    pub removed: Vec<String>,
    /// `(owner, component)` references to components absent from the store,
    /// as of the final pass.
    pub missing: Vec<(String, String)>,
}

impl DecompStore {
    /// Recompute owner lists and remove ownerless intermediates until a
    /// fixpoint is reached.
    pub fn resolve(&mut self) -> ResolveReport {
        let mut report = ResolveReport::default();
        loop {
            report.passes += 1;
            report.missing = self.compute_owners();

            let orphans: AHashSet<String> = self
                .seq
                .iter()
                .filter(|key| is_intermediate(key) && self.owners(key).is_empty())
                .cloned()
                .collect();
            tracing::info!(
                pass = report.passes,
                count = orphans.len(),
                "ownerless intermediates"
            );
            if orphans.is_empty() {
                break;
            }

            let mut removed: Vec<String> = orphans.iter().cloned().collect();
            removed.sort_by(|a, b| key_cmp(a, b));
            for key in &removed {
                tracing::warn!(key = %key, "intermediate deleted because it has no owners");
            }
            report.removed.extend(removed);

            let entries: AHashMap<_, _> = std::mem::take(&mut self.entries)
                .into_iter()
                .filter(|(key, _)| !orphans.contains(key))
                .collect();
            let seq: Vec<String> = std::mem::take(&mut self.seq)
                .into_iter()
                .filter(|key| !orphans.contains(key))
                .collect();
            self.entries = entries;
            self.seq = seq;
        }

        for (owner, comp) in &report.missing {
            tracing::warn!(owner = %owner, component = %comp, "component missing from decomposition map");
        }
        report
    }

    /// One owner computation. Returns the dangling component references.
    fn compute_owners(&mut self) -> Vec<(String, String)> {
        let mut owners: AHashMap<String, Vec<String>> = AHashMap::with_capacity(self.entries.len());
        let mut missing = Vec::new();

        for (key, entry) in &self.entries {
            for comp in &entry.record.components {
                if !comp.is_empty() && self.entries.contains_key(comp) {
                    owners.entry(comp.clone()).or_default().push(key.clone());
                } else {
                    missing.push((key.clone(), comp.clone()));
                }
            }
        }

        for (key, entry) in self.entries.iter_mut() {
            let mut list = owners.remove(key).unwrap_or_default();
            list.sort_by(|a, b| key_cmp(a, b));
            entry.owners = list;
        }

        missing.sort_by(|a, b| key_cmp(&a.0, &b.0).then_with(|| a.1.cmp(&b.1)));
        missing
    }
}
