//! Merging partial tables is order-independent.

use proptest::prelude::*;

use station_agg::rng::XorShift64;
use station_agg::{merge_all, merge_pairwise, AggregateTable};

fn partials() -> impl Strategy<Value = Vec<AggregateTable>> {
    let entry = (prop::sample::select(vec!["a", "b", "c", "d", "Zürich"]), -500i64..=500);
    prop::collection::vec(prop::collection::vec(entry, 0..20), 0..12).prop_map(|tables| {
        tables
            .into_iter()
            .map(|rows| {
                rows.into_iter()
                    .map(|(k, v)| (k.as_bytes(), v))
                    .collect::<AggregateTable>()
            })
            .collect::<Vec<_>>()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn shuffled_merge_matches_sequential(tables in partials(), seed in any::<u64>()) {
        let sequential = merge_all(tables.clone());

        let mut shuffled = tables.clone();
        XorShift64::new(seed).shuffle(&mut shuffled);
        prop_assert_eq!(&merge_all(shuffled), &sequential);

        prop_assert_eq!(&merge_pairwise(tables), &sequential);
    }

    #[test]
    fn merge_with_empty_is_identity(tables in partials()) {
        let merged = merge_all(tables);
        let mut with_empty = merged.clone();
        with_empty.merge(AggregateTable::new());
        prop_assert_eq!(&with_empty, &merged);

        let mut empty_first = AggregateTable::new();
        empty_first.merge(merged.clone());
        prop_assert_eq!(empty_first, merged);
    }
}
