//! Section Selection and Ordering
//!
//! [`SectionBoard`] owns the section catalog, the selected subset, and the
//! output ordering. The ordering is always a permutation of the selection:
//! every membership change reconciles the order list (new ids appended,
//! removed ids dropped, relative order of the remainder preserved).

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::{DataMode, SectionInfo};

/// Catalog, selection, and ordering of data sections.
///
/// Unknown ids are ignored rather than rejected: the upstream catalog may
/// change between renders, so stale ids from a previous catalog must not
/// error out of a user interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionBoard {
    /// Catalog in first-appearance order; the default output ordering.
    catalog: IndexMap<String, SectionInfo>,
    /// Selected ids; order-insensitive.
    selected: HashSet<String>,
    /// Output ordering; always a permutation of `selected`.
    order: Vec<String>,
}

impl SectionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog, dropping selection/order entries whose ids no
    /// longer exist.
    pub fn set_catalog(&mut self, sections: Vec<SectionInfo>) {
        self.catalog = sections.into_iter().map(|s| (s.id.clone(), s)).collect();
        self.selected.retain(|id| self.catalog.contains_key(id));
        self.reconcile_order();
    }

    /// The full catalog, in default order.
    pub fn catalog(&self) -> impl Iterator<Item = &SectionInfo> {
        self.catalog.values()
    }

    /// Catalog entries visible under the given data mode.
    pub fn visible(&self, mode: DataMode) -> Vec<&SectionInfo> {
        self.catalog.values().filter(|s| s.visible_in(mode)).collect()
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.catalog.contains_key(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_ids(&self) -> &HashSet<String> {
        &self.selected
    }

    /// Output ordering; a permutation of the selected ids.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Selected sections in output order.
    pub fn ordered_sections(&self) -> Vec<&SectionInfo> {
        self.order
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    /// Add an id to the selection. No-op if already selected; unknown ids
    /// are ignored.
    pub fn select(&mut self, id: &str) {
        if !self.catalog.contains_key(id) {
            log::debug!("select: ignoring unknown section id {id:?}");
            return;
        }
        if self.selected.insert(id.to_string()) {
            self.order.push(id.to_string());
        }
    }

    /// Remove an id from the selection. No-op if not selected.
    pub fn deselect(&mut self, id: &str) {
        if self.selected.remove(id) {
            self.order.retain(|o| o != id);
        }
    }

    /// Select every catalog id visible under the given data mode.
    pub fn select_all(&mut self, mode: DataMode) {
        let ids: Vec<String> = self
            .catalog
            .values()
            .filter(|s| s.visible_in(mode))
            .map(|s| s.id.clone())
            .collect();
        for id in ids {
            self.select(&id);
        }
    }

    /// Clear the selection (and therefore the order).
    pub fn clear_all(&mut self) {
        self.selected.clear();
        self.order.clear();
    }

    /// Deselect everything not visible under the given mode. Used when the
    /// data mode changes so the selection never references hidden sections.
    pub fn retain_visible(&mut self, mode: DataMode) {
        let catalog = &self.catalog;
        self.selected
            .retain(|id| catalog.get(id).is_some_and(|s| s.visible_in(mode)));
        self.reconcile_order();
    }

    /// Move the element at `from` to `to`, shifting intermediates.
    /// Out-of-range indices are clamped rather than rejected, to tolerate
    /// rapid drag events racing against list-length changes.
    pub fn move_item(&mut self, from: usize, to: usize) {
        if self.order.is_empty() {
            return;
        }
        let last = self.order.len() - 1;
        let from = from.min(last);
        let to = to.min(last);
        if from == to {
            return;
        }
        let id = self.order.remove(from);
        self.order.insert(to, id);
    }

    /// Restore the order to the catalog's default relative ordering,
    /// filtered to the current selection.
    pub fn reset_order(&mut self) {
        self.order = self
            .catalog
            .keys()
            .filter(|id| self.selected.contains(*id))
            .cloned()
            .collect();
    }

    /// Re-derive the order from the selection: drop ids no longer selected
    /// (preserving relative order), append newly selected ids at the end.
    fn reconcile_order(&mut self) {
        self.order.retain(|id| self.selected.contains(id));
        let present: HashSet<&String> = self.order.iter().collect();
        let missing: Vec<String> = self
            .catalog
            .keys()
            .filter(|id| self.selected.contains(*id) && !present.contains(id))
            .cloned()
            .collect();
        self.order.extend(missing);
    }

    /// Whether the order is a valid permutation of the selection.
    /// Exposed for tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        if self.order.len() != self.selected.len() {
            return false;
        }
        let order_set: HashSet<&String> = self.order.iter().collect();
        order_set.len() == self.order.len()
            && self.selected.iter().all(|id| order_set.contains(id))
    }
}

// ============================================================================
// Tests
// ============================================================================
