//! Multi-select state.
//!
//! Selection is tracked per model row, not per display row, so it survives
//! sorting, paging and filtering. Only the rows a submission could actually
//! see are reconciled against it; everything else is left alone.

use std::collections::BTreeSet;
use std::ops::Range;

use horizon_grid_core::logging::targets;

use crate::model::SortIndex;

/// Selected and read-only model rows.
///
/// Read-only rows render as checked and disabled. A form never submits a
/// disabled checkbox, so reconciliation must not clear them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelectState {
    selected: BTreeSet<usize>,
    readonly: BTreeSet<usize>,
}

impl MultiSelectState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `row` is selected.
    pub fn is_selected(&self, row: usize) -> bool {
        self.selected.contains(&row)
    }

    /// Returns `true` if `row` is read-only.
    pub fn is_readonly(&self, row: usize) -> bool {
        self.readonly.contains(&row)
    }

    /// Selected rows in ascending order.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Read-only rows in ascending order.
    pub fn readonly_rows(&self) -> Vec<usize> {
        self.readonly.iter().copied().collect()
    }

    /// Number of selected rows.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selects or deselects `row`.
    pub fn set_selected(&mut self, row: usize, selected: bool) {
        if selected {
            self.selected.insert(row);
        } else {
            self.selected.remove(&row);
        }
    }

    /// Marks or unmarks `row` as read-only.
    pub fn set_readonly(&mut self, row: usize, readonly: bool) {
        if readonly {
            self.readonly.insert(row);
        } else {
            self.readonly.remove(&row);
        }
    }

    /// Selects every row in `rows`.
    pub fn select_all(&mut self, rows: impl IntoIterator<Item = usize>) {
        self.selected.extend(rows);
    }

    /// Deselects every row.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Forgets selection and read-only marks.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.readonly.clear();
    }

    /// Reconciles the selection with one submitted set of checked rows.
    ///
    /// Walks the display rows in `window`, maps each through `sort_index`
    /// and then `to_model_row` (the identity when no filter is active), and
    /// sets the model row selected exactly when it was submitted. Read-only
    /// rows are never cleared. Rows outside the window keep their state.
    pub fn reconcile<F>(
        &mut self,
        submitted: &[usize],
        window: Range<usize>,
        sort_index: &SortIndex,
        to_model_row: F,
    ) where
        F: Fn(usize) -> usize,
    {
        let mut pending: BTreeSet<usize> = submitted.iter().copied().collect();
        let mut selected = self.selected.clone();

        for display_row in window {
            let Some(active_row) = sort_index.model_row(display_row) else {
                break;
            };
            let model_row = to_model_row(active_row);
            if pending.remove(&model_row) {
                selected.insert(model_row);
            } else if !self.readonly.contains(&model_row) {
                selected.remove(&model_row);
            }
        }

        if !pending.is_empty() {
            tracing::warn!(
                target: targets::SELECTION,
                ignored = ?pending,
                "submitted rows outside the visible window were ignored"
            );
        }
        tracing::trace!(
            target: targets::SELECTION,
            before = self.selected.len(),
            after = selected.len(),
            "reconciled selection"
        );
        self.selected = selected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_selects_and_clears_visible_rows() {
        let index = SortIndex::identity(10);
        let mut state = MultiSelectState::new();
        state.set_selected(1, true);
        state.set_selected(7, true);

        state.reconcile(&[2, 3], 0..5, &index, |row| row);

        assert_eq!(state.selected_rows(), vec![2, 3, 7]);
    }

    #[test]
    fn test_reconcile_maps_through_sort_index() {
        let mut index = SortIndex::identity(6);
        index.sort_by(|a, b| b.cmp(&a));
        let mut state = MultiSelectState::new();
        state.set_selected(0, true);

        // Display rows 0..3 show model rows 5, 4, 3.
        state.reconcile(&[4], 0..3, &index, |row| row);

        assert_eq!(state.selected_rows(), vec![0, 4]);
    }

    #[test]
    fn test_reconcile_keeps_readonly_rows() {
        let index = SortIndex::identity(4);
        let mut state = MultiSelectState::new();
        state.set_selected(1, true);
        state.set_readonly(1, true);

        state.reconcile(&[], 0..4, &index, |row| row);

        assert!(state.is_selected(1));
        assert_eq!(state.selected_count(), 1);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let index = SortIndex::identity(8);
        let mut state = MultiSelectState::new();
        state.reconcile(&[1, 5], 0..8, &index, |row| row);
        let first = state.clone();
        state.reconcile(&[1, 5], 0..8, &index, |row| row);
        assert_eq!(state, first);
    }

    #[test]
    fn test_reconcile_translates_filtered_rows() {
        // Active (filtered) model rows 0, 1 are model rows 2, 4.
        let source_rows = [2, 4];
        let index = SortIndex::identity(2);
        let mut state = MultiSelectState::new();
        state.set_selected(0, true);

        state.reconcile(&[4], 0..2, &index, |row| source_rows[row]);

        assert_eq!(state.selected_rows(), vec![0, 4]);
    }

    #[test]
    fn test_clear_forgets_readonly() {
        let mut state = MultiSelectState::new();
        state.select_all(0..6);
        state.set_readonly(5, true);
        state.clear();
        assert!(state.selected_rows().is_empty());
        assert!(state.readonly_rows().is_empty());
    }
}
