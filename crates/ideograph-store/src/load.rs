//! Building a store from the primary and replacement files.

use anyhow::{Context, Result};
use ideograph_dsl::record::{parse_records, RecordParseError};
use serde::Serialize;
use std::path::Path;

use crate::resolve::ResolveReport;
use crate::store::DecompStore;

/// Totals gathered while building a store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Records read from the primary text.
    pub records: usize,
    /// Records applied from the replacement text.
    pub replacements: usize,
    /// Replacement records whose key had no prior record.
    pub unknown_replacements: Vec<String>,
    #[serde(skip)]
    pub parse_errors: Vec<(usize, RecordParseError)>,
    #[serde(skip)]
    pub replacement_errors: Vec<(usize, RecordParseError)>,
    /// Keys whose component count disagrees with the shape.
    pub arity_issues: Vec<String>,
    pub duplicates: usize,
    pub resolve: ResolveReport,
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

impl DecompStore {
    /// Build a ready store: parse, apply replacements, sort the sequence and
    /// resolve owners.
    pub fn from_text(primary: &str, replacement: Option<&str>) -> (Self, LoadReport) {
        let mut store = DecompStore::new();
        let mut report = LoadReport::default();

        let parsed = parse_records(strip_bom(primary));
        for (line, err) in &parsed.errors {
            tracing::warn!(line = line + 1, error = %err, "skipping malformed record line");
        }
        report.records = parsed.records.len();
        report.parse_errors = parsed.errors;
        for (key, record) in parsed.records {
            store.insert(key, record);
        }

        if let Some(text) = replacement {
            let parsed = parse_records(strip_bom(text));
            for (line, err) in &parsed.errors {
                tracing::warn!(line = line + 1, error = %err, "skipping malformed replacement line");
            }
            report.replacements = parsed.records.len();
            report.replacement_errors = parsed.errors;
            for (key, record) in parsed.records {
                if !store.upsert_replacement(key.clone(), record) {
                    report.unknown_replacements.push(key);
                }
            }
        }

        store.sort_sequence();
        report.duplicates = store.duplicate_count();

        for key in store.unique_keys() {
            if let Some(record) = store.record(key) {
                if let Some(expected) = record.arity_issue() {
                    tracing::debug!(
                        key = %key,
                        shape = %record.shape,
                        components = record.components.len(),
                        expected = %expected,
                        "component count does not match shape"
                    );
                    report.arity_issues.push(key.to_string());
                }
            }
        }

        report.resolve = store.resolve();
        tracing::info!(
            total = store.keys().count(),
            distinct = store.len(),
            duplicates = report.duplicates,
            removed = report.resolve.removed.len(),
            missing = report.resolve.missing.len(),
            "decomposition data loaded"
        );
        (store, report)
    }

    /// Read and build from files. A missing replacement file is logged and
    /// ignored; an unreadable primary file is an error.
    pub fn build(primary: &Path, replacement: Option<&Path>) -> Result<(Self, LoadReport)> {
        let text = std::fs::read_to_string(primary)
            .with_context(|| format!("failed to read decomposition data {}", primary.display()))?;
        let replacement_text = match replacement {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(text) => Some(text),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "replacement data not loaded");
                    None
                }
            },
            None => None,
        };
        Ok(Self::from_text(&text, replacement_text.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_overrides_and_sequence_is_sorted() {
        let primary = "\u{feff}立:c()\n拉:a(扌,立)\n扌:c()\n7:d(一,一)\n一:c()\nbroken:line:here\n";
        let replacement = "扌:me(手)\n手:c()\n";
        let (store, report) = DecompStore::from_text(primary, Some(replacement));
        assert_eq!(report.records, 5);
        assert_eq!(report.parse_errors.len(), 1);
        assert_eq!(report.unknown_replacements, vec!["手"]);
        assert_eq!(report.resolve.removed, vec!["7"]);
        assert_eq!(
            store.keys().collect::<Vec<_>>(),
            vec!["一", "手", "扌", "拉", "立"]
        );
        assert_eq!(store.owners("手"), ["扌"]);
    }

    #[test]
    fn arity_mismatches_are_reported_but_kept() {
        let (store, report) = DecompStore::from_text("木:c()\n朩:a(木)\n", None);
        assert_eq!(report.arity_issues, vec!["朩"]);
        assert!(store.contains("朩"));
    }

    #[test]
    fn build_reads_files_and_tolerates_missing_replacement() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("charData.txt");
        std::fs::write(&primary, "一:c()\n二:rd(一)\n").unwrap();
        let (store, report) =
            DecompStore::build(&primary, Some(&dir.path().join("replaceChars.txt"))).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(report.replacements, 0);

        assert!(DecompStore::build(&dir.path().join("missing.txt"), None).is_err());
    }
}
