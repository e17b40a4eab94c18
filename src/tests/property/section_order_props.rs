//! Property-based tests for section selection and ordering.
//!
//! Invariants:
//! - The order list is always a permutation of the selected set
//! - Moves clamp out-of-range indices instead of panicking
//! - A move and its inverse round-trip to the original order

use proptest::prelude::*;

use crate::core::workflow::{DataMode, SectionBoard, SectionInfo, SectionSource};

const IDS: [&str; 6] = ["s0", "s1", "s2", "s3", "s4", "s5"];

fn board() -> SectionBoard {
    let mut b = SectionBoard::new();
    b.set_catalog(
        IDS.iter()
            .map(|id| SectionInfo::new(*id, id.to_uppercase(), SectionSource::New))
            .collect(),
    );
    b
}

/// One user interaction with the board.
#[derive(Debug, Clone)]
enum Op {
    Select(usize),
    Deselect(usize),
    Move(usize, usize),
    SelectAll,
    ClearAll,
    ResetOrder,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..IDS.len()).prop_map(Op::Select),
        (0..IDS.len()).prop_map(Op::Deselect),
        (0usize..12, 0usize..12).prop_map(|(f, t)| Op::Move(f, t)),
        Just(Op::SelectAll),
        Just(Op::ClearAll),
        Just(Op::ResetOrder),
    ]
}

fn apply(b: &mut SectionBoard, op: &Op) {
    match op {
        Op::Select(i) => b.select(IDS[*i]),
        Op::Deselect(i) => b.deselect(IDS[*i]),
        Op::Move(f, t) => b.move_item(*f, *t),
        Op::SelectAll => b.select_all(DataMode::New),
        Op::ClearAll => b.clear_all(),
        Op::ResetOrder => b.reset_order(),
    }
}

proptest! {
    /// Property: after any edit sequence the order is a duplicate-free
    /// permutation of the selection.
    #[test]
    fn prop_order_is_permutation_of_selection(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut b = board();
        for op in &ops {
            apply(&mut b, op);
            prop_assert!(b.is_consistent(), "inconsistent after {:?}", op);
        }
    }

    /// Property: moving an item and moving it back restores the order.
    #[test]
    fn prop_move_round_trip(
        selected in prop::collection::hash_set(0..IDS.len(), 1..IDS.len()),
        from in 0usize..6,
        to in 0usize..6,
    ) {
        let mut b = board();
        for i in &selected {
            b.select(IDS[*i]);
        }
        let before = b.order().to_vec();
        let last = before.len() - 1;
        let from = from.min(last);
        let to = to.min(last);

        b.move_item(from, to);
        b.move_item(to, from);
        prop_assert_eq!(b.order(), &before[..]);
    }

    /// Property: reset_order always yields the catalog's relative order.
    #[test]
    fn prop_reset_matches_catalog_order(ops in prop::collection::vec(arb_op(), 0..25)) {
        let mut b = board();
        for op in &ops {
            apply(&mut b, op);
        }
        b.reset_order();

        let expected: Vec<&str> = IDS.iter().copied().filter(|id| b.is_selected(id)).collect();
        prop_assert_eq!(b.order(), &expected[..]);
    }
}
