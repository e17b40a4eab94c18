//! Property-based tests for placeholder scanning.
//!
//! Invariants:
//! - Scanning is idempotent: same template and board, same report
//! - Token offsets and lengths stay inside the template
//! - Scanning never panics on arbitrary input, including lone braces

use proptest::prelude::*;

use crate::core::prompts::placeholders::scan;
use crate::core::workflow::{SectionBoard, SectionInfo, SectionSource};

fn arb_board() -> impl Strategy<Value = SectionBoard> {
    prop::collection::hash_set("[a-z_]{2,8}", 0..5).prop_map(|ids| {
        let mut b = SectionBoard::new();
        b.set_catalog(
            ids.iter()
                .map(|id| SectionInfo::new(id.clone(), id.clone(), SectionSource::New))
                .collect(),
        );
        for id in ids.iter().take(2) {
            b.select(id);
        }
        b
    })
}

// Includes brace runs, unicode, and id-like words
fn arb_template() -> impl Strategy<Value = String> {
    "([a-z_ ]|\\{|\\}|é|,){0,60}"
}

proptest! {
    /// Property: scanning the same input twice yields identical reports.
    #[test]
    fn prop_scan_is_idempotent(template in arb_template(), board in arb_board()) {
        let first = scan(&template, &board);
        let second = scan(&template, &board);
        prop_assert_eq!(first, second);
    }

    /// Property: every reported offset and length fits in the template.
    #[test]
    fn prop_offsets_within_bounds(template in arb_template(), board in arb_board()) {
        let char_len = template.chars().count();
        let report = scan(&template, &board);

        for token in &report.tokens {
            prop_assert!(token.offset + token.len <= char_len);
            prop_assert!(token.len >= 4, "shortest token is {{x}}");
        }
        for warning in &report.warnings {
            prop_assert!(warning.offset < char_len.max(1));
        }
    }

    /// Property: a well-formed token over a selected id is always valid.
    #[test]
    fn prop_selected_token_is_valid(id in "[a-z_]{2,8}", prefix in "[a-z ]{0,20}") {
        let mut board = SectionBoard::new();
        board.set_catalog(vec![SectionInfo::new(id.clone(), "T", SectionSource::New)]);
        board.select(&id);

        let template = format!("{prefix}{{{{{id}}}}}");
        let report = scan(&template, &board);
        prop_assert!(report.is_clean(), "report: {:?}", report);
        prop_assert_eq!(report.tokens.len(), 1);
        prop_assert_eq!(report.tokens[0].offset, prefix.chars().count());
    }
}
