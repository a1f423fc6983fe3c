use mastery_core::{Level, NewWord, Store};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn n_increments_yield_count_n(n in 1u32..40) {
        let store = Store::in_memory().unwrap();
        let id = store.add_word(&NewWord::new(Level::new(1).unwrap(), "run", "يجري")).unwrap();
        for _ in 0..n {
            store.increment_word_error("ali", id).unwrap();
        }
        prop_assert_eq!(store.get_word_error_count("ali", id).unwrap(), n);
    }

    #[test]
    fn difficult_filter_matches_threshold(
        counts in proptest::collection::vec(0u32..6, 1..8),
        threshold in 1u32..6,
    ) {
        let store = Store::in_memory().unwrap();
        let level = Level::new(2).unwrap();
        let mut expected = Vec::new();
        for (i, &count) in counts.iter().enumerate() {
            let id = store
                .add_word(&NewWord::new(level, format!("w{i}"), format!("ك{i}")))
                .unwrap();
            for _ in 0..count {
                store.increment_word_error("ali", id).unwrap();
            }
            if count >= threshold {
                expected.push((id, count));
            }
        }
        expected.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let got: Vec<_> = store
            .get_difficult_words("ali", threshold)
            .unwrap()
            .into_iter()
            .map(|d| (d.word_id, d.error_count))
            .collect();
        prop_assert_eq!(got, expected);
    }
}
