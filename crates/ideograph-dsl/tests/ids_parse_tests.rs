use ideograph_dsl::ids::{
    parse_ids_file, parse_ids_sequence, IdsKind, IdsOperator, IdsParseError,
};

#[test]
fn parses_binary_operator_with_plain_operands() {
    let d = parse_ids_sequence("⿱氶一").expect("parse");
    assert_eq!(d.kind, IdsKind::Composed(IdsOperator::Down));
    assert_eq!(d.shape(), Some("d"));
    assert_eq!(d.components, vec!["氶", "一"]);
}

#[test]
fn nested_operands_stay_whole() {
    let d = parse_ids_sequence("⿸⿲丨丨⿱𫩏𠂉丶").expect("parse");
    assert_eq!(d.shape(), Some("stl"));
    assert_eq!(d.components, vec!["⿲丨丨⿱𫩏𠂉", "丶"]);
}

#[test]
fn ternary_operators_take_three_operands() {
    let d = parse_ids_sequence("⿲彳山攵").expect("parse");
    assert_eq!(d.shape(), Some("a"));
    assert_eq!(d.components.len(), 3);
    let d = parse_ids_sequence("⿳亠口⿰{12}丶").expect("parse");
    assert_eq!(d.shape(), Some("d"));
    assert_eq!(d.components, vec!["亠", "口", "⿰{12}丶"]);
}

#[test]
fn unary_operators_map_to_reflect_and_rotate() {
    assert_eq!(parse_ids_sequence("↔夂").expect("parse").shape(), Some("ref"));
    assert_eq!(parse_ids_sequence("↷凵").expect("parse").shape(), Some("rot"));
}

#[test]
fn overlay_maps_to_lock() {
    let d = parse_ids_sequence("⿻十丨").expect("parse");
    assert_eq!(d.shape(), Some("lock"));
}

#[test]
fn single_character_has_no_shape() {
    let d = parse_ids_sequence("^木$(GHTJKV)").expect("parse");
    assert_eq!(d.kind, IdsKind::Single('木'));
    assert_eq!(d.shape(), None);
    assert_eq!(d.shape_token(), "single");
    assert_eq!(d.components, vec!["木"]);
    assert!(!d.is_composed());
}

#[test]
fn escapes_are_valid_operands_but_not_sequences() {
    let d = parse_ids_sequence("⿰{27}土").expect("parse");
    assert_eq!(d.components, vec!["{27}", "土"]);
    assert!(matches!(
        parse_ids_sequence("{27}"),
        Err(IdsParseError::TopLevelEscape { .. })
    ));
}

#[test]
fn truncated_sequences_report_missing_operand() {
    assert!(matches!(
        parse_ids_sequence("⿱⿰木"),
        Err(IdsParseError::MissingOperand { index: 0, .. })
    ));
}

#[test]
fn file_loading_skips_comments_and_records_rejects() {
    let text = "\u{feff}# IDS\nU+6C35\t氵\t氵\nU+62C9\t拉\t^⿰扌立$(GHTJKV)\nU+4E00\t一\nU+5DE5\t工\t⿱⿰\n\nU+6C5F\t江\t^⿰氵工$(GTV)\t^⿰氵二$(X)\n";
    let table = parse_ids_file(text).expect("load");
    assert_eq!(table.len(), 3);
    assert_eq!(table.get("拉").and_then(|d| d.shape()), Some("a"));
    assert_eq!(table.get("江").map(|d| d.kind.clone()), Some(IdsKind::Alternatives));
    assert_eq!(
        table.get("江").map(|d| d.components.clone()),
        Some(vec!["⿰氵工".to_string(), "⿰氵二".to_string()])
    );
    assert_eq!(table.malformed, vec![3]);
    assert_eq!(table.rejected.len(), 1);
    assert_eq!(table.rejected[0].0, 4);
    assert_eq!(table.keys().collect::<Vec<_>>(), vec!["氵", "拉", "江"]);
}

#[test]
fn top_level_escape_aborts_the_load() {
    let err = parse_ids_file("U+6C35\t氵\t氵\nU+2FFF\tX\t{99}\n").expect_err("should fail");
    assert_eq!(err.line, 1);
}

#[test]
fn reference_sequences() {
    let cases: &[(&str, bool, Option<&str>, usize)] = &[
        ("⿰氶{27}", true, Some("a"), 2),
        ("⿱氶一", true, Some("d"), 2),
        ("両", false, None, 1),
        ("⿲丨丨⿱⿸𠂉丶𫩏", true, Some("a"), 3),
        ("⿸⿲丨丨⿱𫩏𠂉丶", true, Some("stl"), 2),
    ];
    for (seq, composed, shape, len) in cases {
        let d = parse_ids_sequence(seq).expect("parse");
        assert_eq!(d.is_composed(), *composed, "{seq}");
        assert_eq!(d.shape(), *shape, "{seq}");
        assert_eq!(d.components.len(), *len, "{seq}");
    }
}
