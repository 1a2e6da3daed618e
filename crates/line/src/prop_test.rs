#![cfg(test)]

use crate::build::LineBuilder;
use crate::chain::InsertOutcome;
use crate::portion::Portion;
use crate::test_utils::{chain_of, kinds_and_lens, metrics};
use proptest::prelude::*;
use proptest::sample::Index;

fn arb_portion() -> impl Strategy<Value = Portion> {
    prop_oneof![
        (1u32..8).prop_map(Portion::text),
        Just(Portion::blank(' ')),
        (0u32..60).prop_map(Portion::tab_left),
        Just(Portion::soft_hyphen()),
        Just(Portion::line_break()),
        (0u32..4).prop_map(Portion::hole),
        Just(Portion::glue(0)),
        (1u32..5).prop_map(|n| Portion::field("ref", n)),
        Just(Portion::margin()),
    ]
}

proptest! {
    #[test]
    fn prop_total_len_matches_sum(
        portions in prop::collection::vec(arb_portion(), 1..12),
    ) {
        let expected: u32 = portions.iter().map(|p| p.len()).sum();
        let (chain, _) = chain_of(portions);
        prop_assert_eq!(chain.total_len(), expected);
    }

    #[test]
    fn prop_cut_then_reinsert_round_trips(
        portions in prop::collection::vec(arb_portion(), 2..10),
        pick in any::<Index>(),
    ) {
        let (mut chain, ids) = chain_of(portions);
        let at = 1 + pick.index(ids.len() - 1);
        let before = kinds_and_lens(&chain);

        let victim = chain.cut(ids[at - 1], ids[at]).unwrap();
        let outcome = chain.insert_after(ids[at - 1], victim).unwrap();

        prop_assert!(matches!(outcome, InsertOutcome::Inserted(_)));
        prop_assert_eq!(kinds_and_lens(&chain), before);
    }

    #[test]
    fn prop_truncate_removes_exact_count(
        portions in prop::collection::vec(arb_portion(), 1..10),
        pick in any::<Index>(),
    ) {
        let (mut chain, ids) = chain_of(portions);
        let at = pick.index(ids.len());
        let tail = ids.len() - 1 - at;

        prop_assert_eq!(chain.truncate_after(ids[at]).unwrap(), tail);
        prop_assert_eq!(chain.portion_count(), at + 1);
    }

    #[test]
    fn prop_compress_preserves_covered_characters(
        portions in prop::collection::vec(arb_portion(), 1..12),
    ) {
        let (mut chain, _) = chain_of(portions);
        let count_before = chain.portion_count();
        let len_before = chain.total_len();
        let covered_before: Vec<_> = chain
            .iter()
            .filter(|(_, p)| !p.is_empty())
            .map(|(_, p)| (p.kind(), p.len()))
            .collect();

        let removed = chain.compress();

        prop_assert_eq!(chain.portion_count() + removed, count_before);
        prop_assert_eq!(chain.total_len(), len_before);
        let covered_after: Vec<_> = chain
            .iter()
            .filter(|(_, p)| !p.is_empty())
            .map(|(_, p)| (p.kind(), p.len()))
            .collect();
        prop_assert_eq!(covered_after, covered_before);
    }

    #[test]
    fn prop_composed_lines_cover_all_characters(
        lens in prop::collection::vec(1u32..6, 1..10),
        width in 20u32..200,
    ) {
        let total: u32 = lens.iter().sum();
        let text = "a".repeat(total as usize);
        let m = metrics();
        let builder = LineBuilder::new(&text, &m, width);

        let portions = lens.iter().map(|&n| Portion::text(n)).collect();
        let lines = builder.compose(portions).unwrap();

        let covered: u32 = lines.iter().map(|l| l.len).sum();
        prop_assert_eq!(covered, total);
    }
}
