//! The decomposition store.

use ahash::AHashMap;
use ideograph_dsl::key::{is_intermediate, sort_keys};
use ideograph_dsl::record::{check_record_line, format_record_line, DecompRecord, RecordParseError};
use ideograph_dsl::shape::Shape;
use serde::Serialize;

/// A record together with its derived owner list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub record: DecompRecord,
    /// Keys whose component lists contain this key, in domain order.
    /// Only valid as of the last [`DecompStore::resolve`].
    pub owners: Vec<String>,
}

impl Entry {
    pub fn new(record: DecompRecord) -> Self {
        Self {
            record,
            owners: Vec::new(),
        }
    }
}

/// Key → record map plus the enumeration sequence.
///
/// The sequence records insertion order (duplicates included) until the
/// loader sorts it into the domain ordering.
#[derive(Debug, Clone, Default)]
pub struct DecompStore {
    pub(crate) entries: AHashMap<String, Entry>,
    pub(crate) seq: Vec<String>,
}

impl DecompStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert a record, replacing any previous one for the key. The key is
    /// appended to the enumeration sequence even when it was already there.
    pub fn insert(&mut self, key: impl Into<String>, record: DecompRecord) {
        let key = key.into();
        warn_if_unwritable(&key, &record);
        self.entries.insert(key.clone(), Entry::new(record));
        self.seq.push(key);
    }

    /// Replace the record of an existing key.
    ///
    /// Unknown keys are inserted anyway (with a warning). Returns whether a
    /// record already existed.
    pub fn upsert_replacement(&mut self, key: impl Into<String>, record: DecompRecord) -> bool {
        let key = key.into();
        match self.entries.get_mut(&key) {
            Some(entry) => {
                warn_if_unwritable(&key, &record);
                entry.record = record;
                true
            }
            None => {
                tracing::warn!(key = %key, "replacement record for a key with no prior record");
                self.insert(key, record);
                false
            }
        }
    }

    /// Alias every key in `sources` to `target`.
    ///
    /// Each owner of a source has every occurrence of the source in its
    /// component list replaced by `target`; the source is then removed from
    /// the map and the sequence. Owner lists are stale afterwards.
    pub fn merge<S: AsRef<str>>(&mut self, target: &str, sources: &[S]) {
        for source in sources {
            let source = source.as_ref();
            let owners = self
                .entries
                .get(source)
                .map(|entry| entry.owners.clone())
                .unwrap_or_default();
            for owner in owners {
                if let Some(entry) = self.entries.get_mut(&owner) {
                    for comp in entry.record.components.iter_mut() {
                        if *comp == source {
                            *comp = target.to_string();
                        }
                    }
                }
            }
            if self.entries.remove(source).is_none() {
                tracing::debug!(key = %source, "merge source not in store");
            }
        }
        self.seq
            .retain(|key| !sources.iter().any(|source| source.as_ref() == key.as_str()));
    }

    /// Sort the enumeration sequence into the domain ordering.
    pub fn sort_sequence(&mut self) {
        sort_keys(&mut self.seq);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn lookup(&self, key: &str) -> Option<(&Shape, &[String])> {
        self.entries
            .get(key)
            .map(|entry| (&entry.record.shape, entry.record.components.as_slice()))
    }

    pub fn record(&self, key: &str) -> Option<&DecompRecord> {
        self.entries.get(key).map(|entry| &entry.record)
    }

    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Owner list of `key` (empty for unknown keys).
    pub fn owners(&self, key: &str) -> &[String] {
        self.entries
            .get(key)
            .map(|entry| entry.owners.as_slice())
            .unwrap_or(&[])
    }

    /// Components of `key` (empty for leaves and unknown keys).
    pub fn components(&self, key: &str) -> &[String] {
        self.entries
            .get(key)
            .map(|entry| entry.record.components.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in enumeration order, duplicates included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.seq.iter().map(String::as_str)
    }

    /// Keys in enumeration order, each at most once.
    pub fn unique_keys(&self) -> Vec<&str> {
        let mut seen = ahash::AHashSet::with_capacity(self.seq.len());
        self.keys().filter(|key| seen.insert(*key)).collect()
    }

    /// Intermediate keys in enumeration order.
    pub fn intermediates(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|key| is_intermediate(key))
    }

    /// Enumeration entries beyond the number of distinct keys.
    pub fn duplicate_count(&self) -> usize {
        self.seq.len().saturating_sub(self.entries.len())
    }

    /// Records whose serialized line would not parse back, in enumeration order.
    pub fn unwritable(&self) -> Vec<(&str, RecordParseError)> {
        self.unique_keys()
            .into_iter()
            .filter_map(|key| {
                let entry = self.entries.get(key)?;
                check_record_line(key, &entry.record).err().map(|err| (key, err))
            })
            .collect()
    }

    /// The store in the record grammar, one line per enumeration entry.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for key in &self.seq {
            if let Some(entry) = self.entries.get(key) {
                out.push_str(&format_record_line(key, &entry.record));
                out.push('\n');
            }
        }
        out
    }
}

fn warn_if_unwritable(key: &str, record: &DecompRecord) {
    if let Err(err) = check_record_line(key, record) {
        tracing::warn!(key = %key, error = %err, "record will not survive serialization");
    }
}
