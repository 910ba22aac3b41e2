//! Integration tests for the complete ideograph pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - nested input → unnest → store → ownership
//! - store + IDS data → merge suggestions → merge → resolve
//! - Unihan readers alongside the decomposition map
//!
//! Run with: cargo test --test integration_tests

use ideograph_dsl::blocks::{classify_key, UnicodeBlock};
use ideograph_dsl::ids::parse_ids_file;
use ideograph_dsl::unnest::unnest_text;
use ideograph_store::DecompStore;
use ideograph_unihan::{Frequencies, IrgSources, Priority, SyllableTable};
use std::fs;
use tempfile::tempdir;

// ============================================================================
// Unnest → store
// ============================================================================

#[test]
fn test_unnested_records_load_with_owned_intermediates() {
    let unnested = unnest_text("森:d(木,a(木,木))\n木:c()\n", 70100);
    assert!(unnested.errors.is_empty());
    assert_eq!(unnested.next, 70101);

    let (store, report) = DecompStore::from_text(&unnested.lines.join("\n"), None);
    assert!(report.parse_errors.is_empty());
    assert!(report.resolve.removed.is_empty());
    assert_eq!(store.intermediates().collect::<Vec<_>>(), vec!["70100"]);
    assert_eq!(store.owners("70100"), ["森"]);
    assert_eq!(store.owners("木"), ["70100", "70100", "森"]);
}

#[test]
fn test_orphan_chains_are_removed_over_several_passes() {
    let (store, report) = DecompStore::from_text(
        "一:c()\n70100:a(一,一)\n70101:d(70100,一)\n",
        None,
    );
    assert_eq!(report.resolve.removed, vec!["70101", "70100"]);
    assert_eq!(report.resolve.passes, 3);
    assert_eq!(store.keys().collect::<Vec<_>>(), vec!["一"]);
    assert!(store.owners("一").is_empty());
}

// ============================================================================
// Files on disk
// ============================================================================

#[test]
fn test_build_from_files_applies_replacements() {
    let dir = tempdir().unwrap();
    let primary = dir.path().join("charData.txt");
    let replacement = dir.path().join("replaceChars.txt");
    fs::write(&primary, "\u{feff}拉:a(扌,立)\n扌:c()\n立:c()\n").unwrap();
    fs::write(&replacement, "扌:me(手)\n手:c()\n").unwrap();

    let (store, report) = DecompStore::build(&primary, Some(replacement.as_path())).unwrap();
    assert_eq!(report.unknown_replacements, vec!["手"]);
    assert_eq!(store.record("扌").unwrap().to_string(), "me(手)");
    assert_eq!(store.owners("手"), ["扌"]);

    let rewritten = dir.path().join("newCharData.txt");
    fs::write(&rewritten, store.serialize()).unwrap();
    let (reloaded, _) = DecompStore::build(&rewritten, None).unwrap();
    assert_eq!(reloaded.serialize(), store.serialize());
}

#[test]
fn test_missing_replacement_file_is_not_fatal() {
    let dir = tempdir().unwrap();
    let primary = dir.path().join("charData.txt");
    fs::write(&primary, "一:c()\n").unwrap();
    let (store, _) = DecompStore::build(&primary, Some(dir.path().join("absent.txt").as_path())).unwrap();
    assert_eq!(store.len(), 1);
    assert!(DecompStore::build(&dir.path().join("absent.txt"), None).is_err());
}

// ============================================================================
// IDS cross-checks feeding merges
// ============================================================================

#[test]
fn test_ids_merge_suggestions_apply_cleanly() {
    let (mut store, _) = DecompStore::from_text(
        "一:c()\n木:c()\n目:c()\n30:a(木,一)\n相:a(30,目)\n",
        None,
    );
    let ids = parse_ids_file("U+76F8\t相\t⿰木目\n").unwrap();

    let suggestions = store.ids_merges(&ids);
    assert_eq!(suggestions.len(), 1);
    let merge = &suggestions[0];
    assert_eq!((merge.target.as_str(), merge.intermediate.as_str()), ("木", "30"));

    store.merge(&merge.target, &[merge.intermediate.as_str()]);
    let report = store.resolve();
    assert!(report.missing.is_empty());
    assert!(!store.contains("30"));
    assert_eq!(store.record("相").unwrap().components, vec!["木", "目"]);
    assert_eq!(store.owners("木"), ["相"]);
    assert!(store.ids_merges(&ids).is_empty());
}

// ============================================================================
// Unihan alongside the decomposition map
// ============================================================================

#[test]
fn test_core_characters_classify_as_unified_ideographs() {
    let irg = IrgSources::from_text(
        "U+4E00\tkIICore\tAGHJKMPT\nU+4E2D\tkIICore\tAGHJKMPT\nU+4E2D\tkIRG_GSource\tG0-5650\n",
    );
    let (store, _) = DecompStore::from_text("一:c()\n丨:c()\n口:c()\n中:lock(口,丨)\n", None);

    let core: Vec<char> = irg.by_priority(Priority::A).map(|c| c.ch).collect();
    assert_eq!(core, vec!['一', '中']);
    for ch in core {
        let key = ch.to_string();
        assert!(store.contains(&key));
        assert_eq!(classify_key(&key), Some(UnicodeBlock::Unihan));
    }
    assert!(irg.is_simplified('中'));

    let tallies = store.block_tallies();
    assert_eq!(tallies.keys_in(UnicodeBlock::Unihan), 4);
    assert_eq!(tallies.pair(UnicodeBlock::Unihan, UnicodeBlock::Unihan), 2);
}

#[test]
fn test_syllables_of_stored_characters_order_by_frequency() {
    let irg = IrgSources::from_text("U+8FD9\tkIRG_GSource\tG0-5554\n");
    let freq = Frequencies::from_text("U+9019\tkFrequency\t1\nU+8FD9\tkFrequency\t2\n", &irg);
    let table = SyllableTable::from_text("U+9019\tkMandarin\tzhè\nU+8FD9\tkMandarin\tzhè\n");
    let (store, _) = DecompStore::from_text("這:sbl(辶,言)\n这:sbl(辶,文)\n辶:c()\n言:c()\n文:c()\n", None);

    let mut chars = table.get("zhè").unwrap().chars.clone();
    freq.order(&mut chars);
    assert_eq!(chars, vec!['这', '這']);
    for ch in chars {
        assert_eq!(store.components(&ch.to_string())[0], "辶");
    }
}
