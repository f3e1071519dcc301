//! Display-row to model-row permutation.

use std::cmp::Ordering;

/// Maps display rows to model rows: `index[display_row] == model_row`.
///
/// Always a permutation of `0..len`. Sorting reorders the permutation in
/// place with a stable sort, so rows that tie keep the order the previous
/// sort gave them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortIndex {
    rows: Vec<usize>,
}

impl SortIndex {
    /// The identity permutation over `row_count` rows.
    pub fn identity(row_count: usize) -> Self {
        Self {
            rows: (0..row_count).collect(),
        }
    }

    /// Resets to the identity permutation over `row_count` rows.
    pub fn rebuild(&mut self, row_count: usize) {
        self.rows.clear();
        self.rows.extend(0..row_count);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The model row shown at `display_row`.
    pub fn model_row(&self, display_row: usize) -> Option<usize> {
        self.rows.get(display_row).copied()
    }

    /// The display position of `model_row`.
    pub fn display_row(&self, model_row: usize) -> Option<usize> {
        self.rows.iter().position(|&row| row == model_row)
    }

    /// The permutation as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.rows
    }

    /// Stable in-place sort of the permutation by a model-row comparator.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(usize, usize) -> Ordering,
    {
        self.rows.sort_by(|&a, &b| compare(a, b));
    }

    /// Returns `true` if the index is a permutation of `0..len`.
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.rows.len()];
        for &row in &self.rows {
            match seen.get_mut(row) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}
