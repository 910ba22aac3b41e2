use ideograph_dsl::key::{is_intermediate, key_cmp, sort_keys};
use ideograph_dsl::record::{
    check_record_line, format_record_line, parse_record_line, parse_records, DecompRecord,
};
use proptest::prelude::*;
use std::cmp::Ordering;

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::string::string_regex("[1-9][0-9]{0,5}").unwrap(),
        proptest::string::string_regex("[一-龥]").unwrap(),
        proptest::string::string_regex("[𠀀-𪛖]").unwrap(),
    ]
}

fn shape() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9]{0,4}(/[tmso])?").unwrap()
}

fn writable_record() -> impl Strategy<Value = (String, DecompRecord)> {
    (key(), record()).prop_filter("reserved characters", |(k, r)| check_record_line(k, r).is_ok())
}

fn record() -> impl Strategy<Value = DecompRecord> {
    (
        shape(),
        proptest::collection::vec(key(), 0..5),
        proptest::string::string_regex("[ a-z/丆():,（）]{0,8}").unwrap(),
    )
        .prop_map(|(shape, components, comment)| DecompRecord::new(shape, components, comment))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn writable_records_roundtrip_and_others_do_not(k in key(), rec in record()) {
        let line = format_record_line(&k, &rec);
        let parsed = parse_record_line(&line);
        if check_record_line(&k, &rec).is_ok() {
            prop_assert_eq!(parsed, Ok(Some((k, rec))));
        } else {
            prop_assert!(rec.comment.contains(':'));
            prop_assert_ne!(parsed, Ok(Some((k, rec))));
        }
    }

    #[test]
    fn whole_texts_roundtrip(records in proptest::collection::vec(writable_record(), 0..20)) {
        let text: String = records
            .iter()
            .map(|(k, r)| format!("{}\n", format_record_line(k, r)))
            .collect();
        let parsed = parse_records(&text);
        prop_assert!(parsed.errors.is_empty());
        prop_assert_eq!(parsed.records, records);
    }

    #[test]
    fn sorted_keys_put_intermediates_first(mut keys in proptest::collection::vec(key(), 0..30)) {
        sort_keys(&mut keys);
        for pair in keys.windows(2) {
            prop_assert_ne!(key_cmp(&pair[0], &pair[1]), Ordering::Greater);
            prop_assert!(is_intermediate(&pair[0]) || !is_intermediate(&pair[1]));
        }
    }

    #[test]
    fn key_ordering_is_antisymmetric(a in key(), b in key()) {
        prop_assert_eq!(key_cmp(&a, &b), key_cmp(&b, &a).reverse());
    }
}
