use ideograph_store::DecompStore;
use std::fs;

const DATA: &str = "\
拉:a(扌,立)
扌:c()
立:d(亠,37650)
亠:c()
37650:d(丷,一)
37651:d(丷,一)
丷:c()
一:c()
产:d(亠,37651)
99:a(一,一)
";

#[test]
fn tag_of_leaf_composed_character() {
    let (store, _) = DecompStore::from_text(DATA, None);
    assert_eq!(store.decomp_tag("拉"), "a(扌,立)");
    assert_eq!(store.decomp_tag("立"), "d(亠,d(丷,一))");
}

#[test]
fn orphan_intermediate_is_dropped_on_load() {
    let (store, report) = DecompStore::from_text(DATA, None);
    assert_eq!(report.resolve.removed, vec!["99"]);
    assert!(!store.contains("99"));
    assert_eq!(store.owners("一"), ["37650", "37651"]);
}

#[test]
fn identical_intermediates_share_a_tag_and_merge_cleanly() {
    let (mut store, _) = DecompStore::from_text(DATA, None);
    let group = store
        .tag_groups()
        .into_iter()
        .find(|g| g.key == "d(丷,一)")
        .unwrap();
    assert_eq!(group.members, vec!["37650", "37651"]);

    store.merge("37650", &["37651"]);
    let report = store.resolve();
    assert!(report.removed.is_empty());
    assert_eq!(store.components("产"), ["亠", "37650"]);
    assert_eq!(store.owners("37650"), ["产", "立"]);
    assert!(!store.serialize().contains("37651"));
}

#[test]
fn merging_several_sources_where_one_owns_another() {
    let (mut store, _) = DecompStore::from_text(
        "一:c()\n丨:c()\n十:lock(一,丨)\n5:lock(一,丨)\n6:d(5,丨)\n丙:a(5,6)\n甲:d(5,一)\n乙:a(6,一)\n",
        None,
    );
    assert_eq!(store.owners("5"), ["6", "丙", "甲"]);
    assert_eq!(store.owners("6"), ["丙", "乙"]);

    store.merge("十", &["5", "6"]);
    let report = store.resolve();
    assert!(report.missing.is_empty());
    assert!(report.removed.is_empty());
    assert!(!store.contains("5") && !store.contains("6"));
    assert_eq!(store.components("丙"), ["十", "十"]);
    assert_eq!(store.components("乙"), ["十", "一"]);
    assert_eq!(store.owners("十"), ["丙", "丙", "乙", "甲"]);
    assert_eq!(store.keys().collect::<Vec<_>>(), ["一", "丙", "丨", "乙", "十", "甲"]);
}

#[test]
fn build_from_disk_and_write_back() {
    let dir = tempfile::tempdir().unwrap();
    let primary = dir.path().join("charData.txt");
    let replacement = dir.path().join("replaceChars.txt");
    fs::write(&primary, DATA).unwrap();
    fs::write(&replacement, "扌:me(手)\n手:c()\n").unwrap();

    let (store, report) = DecompStore::build(&primary, Some(replacement.as_path())).unwrap();
    assert_eq!(report.unknown_replacements, vec!["手"]);
    assert_eq!(store.lookup("扌").map(|(s, c)| (s.as_str(), c.len())), Some(("me", 1)));

    let out = dir.path().join("newCharData.txt");
    fs::write(&out, store.serialize()).unwrap();
    let (reloaded, _) = DecompStore::build(&out, None).unwrap();
    assert_eq!(reloaded.serialize(), store.serialize());
}
