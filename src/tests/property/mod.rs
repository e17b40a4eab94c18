//! Property-based tests using the proptest framework.
//!
//! ## Test Modules
//!
//! - `section_order_props`: the ordering list stays a permutation of the
//!   selection through arbitrary edit sequences, and moves are clamped
//! - `prompt_history_props`: undo depth never exceeds the cap and
//!   undo/redo round-trips restore content
//! - `placeholder_props`: scanning is pure, idempotent, and reports
//!   offsets inside the template

mod placeholder_props;
mod prompt_history_props;
mod section_order_props;
