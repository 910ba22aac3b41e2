//! Loading the Unihan readers from files on disk.

use ideograph_unihan::{Frequencies, IrgSources, Priority, SyllableTable, VariantGraph};
use std::fs;

#[test]
fn readers_load_from_a_unihan_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(
        root.join("Unihan_IRGSources.txt"),
        "# header\nU+4E2D\tkIICore\tAGHJKMPT\nU+4E2D\tkIRG_GSource\tG0-5650\nU+8FD9\tkIRG_GSource\tG0-5554\nU+9019\tkIICore\tBHJKMPT\n",
    )
    .unwrap();
    fs::write(
        root.join("Unihan_DictionaryLikeData.txt"),
        "U+4E2D\tkFrequency\t1\nU+9019\tkFrequency\t1\nU+8FD9\tkFrequency\t2\n",
    )
    .unwrap();
    fs::write(
        root.join("Unihan_Readings.txt"),
        "U+4E2D\tkMandarin\tzhōng zhòng\nU+8FD9\tkMandarin\tzhè\nU+9019\tkMandarin\tzhè\nU+4E2D\tkDefinition\tcentral\n",
    )
    .unwrap();
    fs::write(
        root.join("Unihan_Variants.txt"),
        "U+8FD9\tkTraditionalVariant\tU+9019\nU+9019\tkSimplifiedVariant\tU+8FD9\n",
    )
    .unwrap();

    let irg = IrgSources::load(&root.join("Unihan_IRGSources.txt")).unwrap();
    assert_eq!(irg.by_priority(Priority::B).count(), 1);

    let freq = Frequencies::load(&root.join("Unihan_DictionaryLikeData.txt"), &irg).unwrap();
    let table = SyllableTable::load(&root.join("Unihan_Readings.txt")).unwrap();
    let mut zhe = table.get("zhè").unwrap().chars.clone();
    assert_eq!(zhe, vec!['这', '這']);
    zhe.reverse();
    freq.order(&mut zhe);
    assert_eq!(zhe, vec!['这', '這']);
    assert_eq!(table.get("zhòng").unwrap().others, vec!['中']);

    let variants = VariantGraph::load(&root.join("Unihan_Variants.txt")).unwrap();
    let groups = variants.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].pair_count(), 2);

    assert!(IrgSources::load(&root.join("missing.txt")).is_err());
}
