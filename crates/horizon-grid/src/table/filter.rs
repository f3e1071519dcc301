//! Free-text filtering.
//!
//! A filter keeps the rows of the unfiltered model whose visible cells
//! contain the search string, compared case-insensitively against the cell
//! text with markup removed. Matching rows are copied in their original
//! order into an empty copy of the model, which then stands in for the
//! unfiltered model everywhere except selection and row-action ids.

use horizon_grid_core::logging::targets;

use crate::markup::strip_tags;
use crate::model::{ColumnDescriptor, DataModel};

/// Plain text of one cell, as used for filtering and export.
///
/// Prefers the column's hover text when it has one, so that icon and
/// CSS-only cells match on their label rather than on class names.
pub fn cell_text<M: DataModel>(column: &dyn ColumnDescriptor<M>, model: &M, row: usize) -> String {
    let markup = column
        .hover_text(model, row)
        .unwrap_or_else(|| column.render(model, row));
    strip_tags(&markup)
}

/// Active search string and the filtered model derived from it.
#[derive(Debug)]
pub struct FilterState<M> {
    search: Option<String>,
    filtered: Option<M>,
    /// `source_rows[filtered_row] == unfiltered_row`.
    source_rows: Vec<usize>,
}

impl<M> Default for FilterState<M> {
    fn default() -> Self {
        Self {
            search: None,
            filtered: None,
            source_rows: Vec::new(),
        }
    }
}

impl<M: DataModel> FilterState<M> {
    /// Creates an inactive filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active search string.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns `true` if a filter is active.
    pub fn is_active(&self) -> bool {
        self.search.is_some()
    }

    /// The filtered model, if a filter is active.
    pub fn filtered(&self) -> Option<&M> {
        self.filtered.as_ref()
    }

    /// The model to display: the filtered copy when active, else `source`.
    pub fn active<'a>(&'a self, source: &'a M) -> &'a M {
        self.filtered.as_ref().unwrap_or(source)
    }

    /// Unfiltered rows backing each filtered row, in order.
    pub fn source_rows(&self) -> &[usize] {
        &self.source_rows
    }

    /// Maps a row of the active model to a row of the unfiltered model.
    pub fn to_source_row(&self, active_row: usize) -> usize {
        if self.search.is_some() {
            self.source_rows.get(active_row).copied().unwrap_or(active_row)
        } else {
            active_row
        }
    }

    /// Sets or clears the search string and rebuilds the filtered model.
    pub fn set(
        &mut self,
        search: Option<String>,
        source: &M,
        columns: &[Box<dyn ColumnDescriptor<M>>],
    ) {
        self.search = search;
        self.refresh(source, columns);
    }

    /// Sets the search string without a model to evaluate it against. The
    /// filtered model is built by the next [`refresh`](Self::refresh).
    pub fn set_search(&mut self, search: Option<String>) {
        self.search = search;
        self.filtered = None;
        self.source_rows.clear();
    }

    /// Drops the filter.
    pub fn clear(&mut self) {
        self.search = None;
        self.filtered = None;
        self.source_rows.clear();
    }

    /// Re-evaluates the active search string against `source`.
    pub fn refresh(&mut self, source: &M, columns: &[Box<dyn ColumnDescriptor<M>>]) {
        let Some(search) = self.search.clone() else {
            self.filtered = None;
            self.source_rows.clear();
            return;
        };

        let _span = tracing::debug_span!(
            target: targets::FILTER,
            horizon_grid_core::logging::span_names::FILTER,
            search = %search
        )
        .entered();

        let source_rows = matching_rows(&search, source, columns);
        let rows = source_rows
            .iter()
            .filter_map(|&row| source.row(row).cloned())
            .collect();
        let mut filtered = source.create_empty_copy();
        filtered.set_rows(rows);

        tracing::debug!(
            target: targets::FILTER,
            matched = source_rows.len(),
            total = source.row_count(),
            "filtered model"
        );
        self.filtered = Some(filtered);
        self.source_rows = source_rows;
    }
}

/// Rows of `source` with a visible cell containing `search`, ignoring case.
pub fn matching_rows<M: DataModel>(
    search: &str,
    source: &M,
    columns: &[Box<dyn ColumnDescriptor<M>>],
) -> Vec<usize> {
    let needle = search.to_lowercase();
    (0..source.row_count())
        .filter(|&row| {
            let matched = columns
                .iter()
                .filter(|column| column.is_visible())
                .any(|column| {
                    cell_text(column.as_ref(), source, row)
                        .to_lowercase()
                        .contains(&needle)
                });
            tracing::trace!(target: targets::FILTER, row, matched, "filter scan");
            matched
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellRenderer, DefaultColumn, TableDataModel, Value};

    fn create_model() -> TableDataModel<(String, String)> {
        let rows = vec![
            ("alpha", "one"),
            ("beta", "two"),
            ("xABCx", "three"),
            ("gamma", "four"),
            ("delta", "<b>abc</b>"),
        ]
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
        TableDataModel::new(rows, 2, |row: &(String, String), column| match column {
            0 => Value::from(&row.0),
            _ => Value::from(&row.1),
        })
    }

    fn create_columns() -> Vec<Box<dyn ColumnDescriptor<TableDataModel<(String, String)>>>> {
        vec![
            Box::new(DefaultColumn::new("Name", 0)),
            Box::new(DefaultColumn::new("Note", 1)),
        ]
    }

    #[test]
    fn test_filter_keeps_matching_rows_in_order() {
        let model = create_model();
        let columns = create_columns();
        let mut filter = FilterState::new();

        filter.set(Some("abc".into()), &model, &columns);

        let filtered = filter.filtered().unwrap();
        assert_eq!(filtered.row_count(), 2);
        assert_eq!(filter.source_rows(), &[2, 4]);
        assert_eq!(filtered.value_at(0, 0), Value::from("xABCx"));
        assert_eq!(filter.to_source_row(1), 4);
    }

    #[test]
    fn test_filter_matches_escaped_text_not_markup() {
        let model = create_model();
        let columns = create_columns();
        // Row 4 renders as "&lt;b&gt;abc&lt;/b&gt;"; stripped text is "<b>abc</b>".
        assert_eq!(matching_rows("<b>", &model, &columns), vec![4]);
        assert!(matching_rows("&lt;", &model, &columns).is_empty());
    }

    #[test]
    fn test_filter_skips_invisible_columns() {
        let model = create_model();
        let columns: Vec<Box<dyn ColumnDescriptor<_>>> = vec![
            Box::new(DefaultColumn::new("Name", 0)),
            Box::new(DefaultColumn::new("Note", 1).with_visible(false)),
        ];
        assert_eq!(matching_rows("three", &model, &columns), Vec::<usize>::new());
        assert_eq!(matching_rows("gamma", &model, &columns), vec![3]);
    }

    #[test]
    fn test_filter_prefers_hover_text() {
        let model = create_model();
        let columns: Vec<Box<dyn ColumnDescriptor<_>>> = vec![Box::new(
            DefaultColumn::new("Status", 1).with_renderer(CellRenderer::css_with_hover(
                |_| "o_icon_status".to_string(),
                |v| format!("Status {}", v.display_text()),
            )),
        )];
        assert!(matching_rows("o_icon", &model, &columns).is_empty());
        assert_eq!(matching_rows("status two", &model, &columns), vec![1]);
    }

    #[test]
    fn test_clearing_restores_source() {
        let model = create_model();
        let columns = create_columns();
        let mut filter = FilterState::new();
        filter.set(Some("a".into()), &model, &columns);
        filter.clear();

        assert!(!filter.is_active());
        assert!(filter.filtered().is_none());
        assert!(filter.source_rows().is_empty());
        assert!(std::ptr::eq(filter.active(&model), &model));
        assert_eq!(filter.to_source_row(3), 3);
    }
}
