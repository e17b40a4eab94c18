//! Property-based tests for the prompt undo/redo history.
//!
//! Invariants:
//! - Undo depth never exceeds the configured cap
//! - Undo followed by redo restores the pre-undo content
//! - Undo/redo on an empty history never panics and reports false

use proptest::prelude::*;

use crate::core::prompts::PromptWorkspace;
use crate::core::workflow::ContentType;

fn arb_edits() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z {}]{0,30}", 1..30)
}

proptest! {
    /// Property: after any number of edits, at most `depth` undos succeed.
    #[test]
    fn prop_undo_depth_is_capped(edits in arb_edits(), depth in 1usize..10) {
        let mut ws = PromptWorkspace::new(depth);
        let mut distinct_edits = 0usize;
        for text in &edits {
            let before = ws.content(ContentType::Paid).to_string();
            ws.set_content(ContentType::Paid, text);
            if before != *text {
                distinct_edits += 1;
            }
        }

        let mut undos = 0usize;
        while ws.undo(ContentType::Paid) {
            undos += 1;
            prop_assert!(undos <= depth, "undo stack exceeded depth {depth}");
        }
        prop_assert!(undos <= distinct_edits.min(depth));
    }

    /// Property: undo then redo is the identity on content.
    #[test]
    fn prop_undo_redo_round_trip(edits in arb_edits()) {
        let mut ws = PromptWorkspace::default();
        for text in &edits {
            ws.set_content(ContentType::Paid, text);
        }
        let before = ws.content(ContentType::Paid).to_string();

        if ws.undo(ContentType::Paid) {
            prop_assert!(ws.redo(ContentType::Paid));
            prop_assert_eq!(ws.content(ContentType::Paid), before);
        }
    }

    /// Property: exhausting both stacks keeps reporting false, never panics.
    #[test]
    fn prop_empty_stacks_are_noops(edits in prop::collection::vec("[a-z]{0,10}", 0..5)) {
        let mut ws = PromptWorkspace::default();
        for text in &edits {
            ws.set_content(ContentType::Crawler, text);
        }
        while ws.undo(ContentType::Crawler) {}
        prop_assert!(!ws.undo(ContentType::Crawler));
        while ws.redo(ContentType::Crawler) {}
        prop_assert!(!ws.redo(ContentType::Crawler));
    }
}
