use ideograph_unihan::fields::parse_code_point;
use ideograph_unihan::readings::{final_index, initial_index};
use ideograph_unihan::{split_syllable, Frequencies, IrgSources};
use proptest::prelude::*;

const SYLLABLE_LETTERS: &[char] = &[
    'a', 'e', 'i', 'o', 'u', 'ü', 'n', 'g', 'h', 'z', 'c', 's', 'l', 'r', 'm', 'ā', 'á', 'ǎ', 'à',
    'ē', 'é', 'ě', 'è', 'ǖ', 'ǘ', 'ǚ', 'ǜ', 'ń', 'ň', 'ǹ', 'ḿ',
];

fn syllable() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(SYLLABLE_LETTERS), 0..7)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn code_points_round_trip(c in any::<char>()) {
        prop_assert_eq!(parse_code_point(&format!("U+{:04X}", c as u32)), Ok(c));
    }

    #[test]
    fn split_syllable_always_yields_a_tone(reading in syllable()) {
        let parts = split_syllable(&reading);
        prop_assert!((1..=5).contains(&parts.tone));
        prop_assert!(!parts.initial.is_empty());
        prop_assert!(initial_index(&parts.initial) <= 25);
        prop_assert!(final_index(&parts.rime) <= 39);
    }

    #[test]
    fn frequency_order_is_by_rank(freqs in proptest::collection::vec(0u8..=5, 1..20)) {
        let chars: Vec<char> = (0..freqs.len() as u32)
            .filter_map(|i| char::from_u32(0x4E00 + i))
            .collect();
        let mut dictionary = String::new();
        let mut sources = String::new();
        for (i, (ch, freq)) in chars.iter().zip(&freqs).enumerate() {
            if *freq > 0 {
                dictionary.push_str(&format!("U+{:04X}\tkFrequency\t{}\n", *ch as u32, freq));
            }
            if i % 2 == 0 {
                sources.push_str(&format!("U+{:04X}\tkIRG_GSource\tG0-{:04X}\n", *ch as u32, i));
            }
        }
        let irg = IrgSources::from_text(&sources);
        let frequencies = Frequencies::from_text(&dictionary, &irg);

        let mut ordered = chars.clone();
        ordered.reverse();
        frequencies.order(&mut ordered);
        let ranks: Vec<u32> = ordered.iter().map(|c| frequencies.rank(*c)).collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(ordered.len(), chars.len());
    }
}
