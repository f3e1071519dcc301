//! The grid controller.
//!
//! [`GridController`] owns the column descriptors, the attached model, and
//! all view state (sort index, page, selection, filter). Requests are fed in
//! through [`handle`](GridController::handle); every command is validated
//! before the first piece of state is written, so a failing request leaves
//! the grid exactly as it was.

use std::fmt;
use std::ops::Range;
use std::path::Path;

use horizon_grid_core::logging::{span_names, targets};
use horizon_grid_core::{GridConfig, Signal};

use super::command::{
    BatchAction, Command, CommandDecoder, DecodedRequest, FormParams, PageAction, ParamNames,
};
use super::filter::FilterState;
use super::page::PageState;
use super::selection::MultiSelectState;
use crate::error::{GridError, Result};
use crate::model::{ColumnDescriptor, DataModel, SortIndex};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl SortOrder {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Returns `true` for ascending order.
    pub fn is_ascending(self) -> bool {
        self == SortOrder::Ascending
    }
}

/// An action the owning page has to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    /// A row-action link was followed.
    RowAction {
        /// Row of the unfiltered model.
        row: usize,
        /// Action identifier.
        action: String,
    },
    /// A batch action was submitted.
    BatchAction {
        /// Action identifier.
        action: String,
        /// Selected rows of the unfiltered model, ascending.
        selected: Vec<usize>,
    },
}

/// Sort column, as a position in the descriptor list, and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SortState {
    position: usize,
    order: SortOrder,
}

/// A stateful, server-rendered data grid over a model of type `M`.
///
/// Column indices in the public API count visible columns only, in their
/// current order. Row ids (selection, row actions, highlighting) are rows of
/// the unfiltered model.
///
/// # Example
///
/// ```
/// use horizon_grid::prelude::*;
///
/// let model = TableDataModel::new(vec![3, 1, 2], 1, |row: &i64, _| Value::Int(*row));
/// let mut grid = GridController::new("scores", GridConfig::new().with_page_size(2))
///     .with_column(DefaultColumn::new("Score", 0));
/// grid.set_model(model).unwrap();
///
/// grid.handle(&FormParams::from_query("scores_cmd=cid&scores_param=0")).unwrap();
/// assert_eq!(grid.visible_rows(), vec![1, 2]);
/// ```
pub struct GridController<M: DataModel> {
    names: ParamNames,
    config: GridConfig,
    columns: Vec<Box<dyn ColumnDescriptor<M>>>,
    model: Option<M>,
    sort_index: SortIndex,
    sort: Option<SortState>,
    default_sort_applied: bool,
    page: PageState,
    selection: MultiSelectState,
    filter: FilterState<M>,
    batch_actions: Vec<BatchAction>,
    highlighted_row: Option<usize>,
    dirty: bool,

    /// Emitted after a row action or batch action has been applied.
    pub activated: Signal<GridEvent>,
}

impl<M: DataModel> fmt::Debug for GridController<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridController")
            .field("id", &self.names.id())
            .field("columns", &self.columns.len())
            .field("rows", &self.row_count())
            .field("sort", &self.sort)
            .field("page", &self.page)
            .field("search", &self.filter.search())
            .finish_non_exhaustive()
    }
}

impl<M: DataModel> GridController<M> {
    /// Creates a grid with no columns and no model.
    ///
    /// `id` prefixes every wire parameter of this grid.
    pub fn new(id: impl Into<String>, config: GridConfig) -> Self {
        let page = PageState::new(config.page_size());
        Self {
            names: ParamNames::new(id),
            config,
            columns: Vec::new(),
            model: None,
            sort_index: SortIndex::default(),
            sort: None,
            default_sort_applied: false,
            page,
            selection: MultiSelectState::new(),
            filter: FilterState::new(),
            batch_actions: Vec::new(),
            highlighted_row: None,
            dirty: true,
            activated: Signal::new(),
        }
    }

    /// Creates a grid configured from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Config`] if the file cannot be read or parsed.
    pub fn from_config_file(id: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let config = GridConfig::load(path)?;
        Ok(Self::new(id, config))
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Adds a column using builder pattern.
    pub fn with_column<C>(mut self, column: C) -> Self
    where
        C: ColumnDescriptor<M> + 'static,
    {
        self.add_column(column);
        self
    }

    /// Registers a batch action using builder pattern.
    pub fn with_batch_action(mut self, action: BatchAction) -> Self {
        self.add_batch_action(action);
        self
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// The grid id.
    pub fn id(&self) -> &str {
        self.names.id()
    }

    /// Wire parameter names of this grid.
    pub fn param_names(&self) -> &ParamNames {
        &self.names
    }

    /// The grid configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Changes the page size, keeping the current page in range.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.config.page_size = page_size;
        self.page.set_page_size(self.config.page_size());
        self.page.clamp(self.row_count());
        self.dirty = true;
    }

    /// Appends a column descriptor.
    pub fn add_column<C>(&mut self, column: C)
    where
        C: ColumnDescriptor<M> + 'static,
    {
        let mut column: Box<dyn ColumnDescriptor<M>> = Box::new(column);
        if let Some(model) = &self.model {
            column.on_model_changed(model);
        }
        self.columns.push(column);
        self.dirty = true;
    }

    /// Registers a batch action for multi-select mode.
    pub fn add_batch_action(&mut self, action: BatchAction) {
        self.batch_actions.push(action);
        self.dirty = true;
    }

    /// Registered batch actions.
    pub fn batch_actions(&self) -> &[BatchAction] {
        &self.batch_actions
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// All column descriptors, visible or not, in display order.
    pub fn columns(&self) -> &[Box<dyn ColumnDescriptor<M>>] {
        &self.columns
    }

    /// Visible column descriptors in display order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &dyn ColumnDescriptor<M>> {
        self.columns
            .iter()
            .filter(|column| column.is_visible())
            .map(|column| column.as_ref())
    }

    /// Number of visible columns.
    pub fn visible_column_count(&self) -> usize {
        self.visible_columns().count()
    }

    fn visible_positions(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.is_visible())
            .map(|(position, _)| position)
            .collect()
    }

    fn position_of(&self, column: usize) -> Result<usize> {
        let positions = self.visible_positions();
        positions
            .get(column)
            .copied()
            .ok_or_else(|| GridError::unknown_column(column, positions.len()))
    }

    // =========================================================================
    // Model
    // =========================================================================

    /// The unfiltered model.
    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    /// The model being displayed: the filtered copy when a filter is active.
    pub fn active_model(&self) -> Option<&M> {
        self.model.as_ref().map(|model| self.filter.active(model))
    }

    /// Rows of the active model.
    pub fn row_count(&self) -> usize {
        self.active_model().map_or(0, DataModel::row_count)
    }

    /// Rows of the unfiltered model.
    pub fn unfiltered_row_count(&self) -> usize {
        self.model.as_ref().map_or(0, DataModel::row_count)
    }

    /// Attaches a new model, resetting all view state.
    ///
    /// Selection and highlighting are cleared and the sort index is rebuilt
    /// and re-sorted. The page returns to 1 unless multi-select mode asks to
    /// keep it. The first model attached is sorted by the configured default
    /// sort column; later ones keep the current sort. An active filter is
    /// re-evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownColumn`] if the default sort column has no
    /// descriptor, which happens when the model is attached before the
    /// columns are configured. Nothing is changed in that case.
    pub fn set_model(&mut self, model: M) -> Result<()> {
        let sort = match (self.sort, self.config.default_sort_column) {
            (None, Some(column)) if !self.default_sort_applied => Some(SortState {
                position: self.position_of(column)?,
                order: if self.config.default_sort_ascending {
                    SortOrder::Ascending
                } else {
                    SortOrder::Descending
                },
            }),
            (sort, _) => sort,
        };

        for column in &mut self.columns {
            column.on_model_changed(&model);
        }
        tracing::debug!(
            target: targets::COMMAND,
            grid = self.names.id(),
            rows = model.row_count(),
            "model attached"
        );
        self.model = Some(model);
        self.default_sort_applied = true;
        self.sort = sort;
        self.selection.clear();
        self.highlighted_row = None;
        if let Some(model) = &self.model {
            self.filter.refresh(model, &self.columns);
        }
        self.resort();
        if !(self.config.multi_select && self.config.preserve_page_on_model_change) {
            self.page.reset();
        }
        self.page.clamp(self.row_count());
        self.dirty = true;
        Ok(())
    }

    /// Changes the attached model in place, keeping view state where it
    /// still applies.
    ///
    /// The sort index is rebuilt and re-sorted, the filter re-evaluated and
    /// the page clamped. Selection, read-only marks and the highlighted row
    /// are kept only while the row count is unchanged; once rows are added or
    /// removed the positions no longer name the same records and are
    /// cleared. Does nothing if no model is attached.
    pub fn update_model<F>(&mut self, update: F)
    where
        F: FnOnce(&mut M),
    {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        let previous_count = model.row_count();
        update(model);
        for column in &mut self.columns {
            column.on_model_changed(model);
        }
        let row_count = model.row_count();
        if row_count != previous_count {
            tracing::debug!(
                target: targets::SELECTION,
                previous_count,
                row_count,
                "row count changed; clearing selection"
            );
            self.selection.clear();
            self.highlighted_row = None;
        }
        if let Some(model) = &self.model {
            self.filter.refresh(model, &self.columns);
        }
        self.resort();
        self.page.clamp(self.row_count());
        self.dirty = true;
    }

    /// Rebuilds the sort index over the active model and re-applies the
    /// current sort.
    fn resort(&mut self) {
        let Some(source) = &self.model else {
            self.sort_index.rebuild(0);
            return;
        };
        let model = self.filter.active(source);
        self.sort_index.rebuild(model.row_count());
        if let Some(sort) = self.sort {
            sort_rows(&mut self.columns, &mut self.sort_index, model, sort);
        }
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// The display-row to active-model-row permutation.
    pub fn sort_index(&self) -> &SortIndex {
        &self.sort_index
    }

    /// The visible index of the sort column.
    pub fn sort_column(&self) -> Option<usize> {
        let sort = self.sort?;
        self.visible_positions()
            .iter()
            .position(|&position| position == sort.position)
    }

    /// The current sort direction.
    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort.map(|sort| sort.order)
    }

    /// Sorts by a visible column: ascending on a newly chosen column,
    /// flipping direction when it is already the sort column.
    ///
    /// Does nothing while sorting is disabled or for an unsortable column.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownColumn`] if `column` has no descriptor.
    pub fn sort(&mut self, column: usize) -> Result<()> {
        let Some(position) = self.sortable_position(column)? else {
            return Ok(());
        };
        let order = match self.sort {
            Some(sort) if sort.position == position => sort.order.reversed(),
            _ => SortOrder::Ascending,
        };
        self.apply_sort(position, order);
        Ok(())
    }

    /// Sorts by a visible column in the given direction.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownColumn`] if `column` has no descriptor.
    pub fn sort_with_order(&mut self, column: usize, order: SortOrder) -> Result<()> {
        if let Some(position) = self.sortable_position(column)? {
            self.apply_sort(position, order);
        }
        Ok(())
    }

    fn sortable_position(&self, column: usize) -> Result<Option<usize>> {
        if !self.config.sorting_enabled {
            tracing::warn!(target: targets::SORT, column, "sorting is disabled; ignoring sort");
            return Ok(None);
        }
        let position = self.position_of(column)?;
        if !self.columns[position].is_sortable() {
            tracing::warn!(target: targets::SORT, column, "column is not sortable; ignoring sort");
            return Ok(None);
        }
        Ok(Some(position))
    }

    /// Re-sorts the existing permutation in place, so ties keep the order
    /// the previous sort left them in.
    fn apply_sort(&mut self, position: usize, order: SortOrder) {
        let sort = SortState { position, order };
        self.sort = Some(sort);
        if let Some(source) = &self.model {
            let model = self.filter.active(source);
            sort_rows(&mut self.columns, &mut self.sort_index, model, sort);
        }
        self.dirty = true;
        tracing::debug!(target: targets::SORT, position, ?order, "sorted");
    }

    // =========================================================================
    // Column Reordering
    // =========================================================================

    /// Swaps a visible column with its left neighbor. The first column swaps
    /// with the last.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownColumn`] if `column` has no descriptor.
    pub fn move_left(&mut self, column: usize) -> Result<()> {
        self.move_column(column, false)
    }

    /// Swaps a visible column with its right neighbor. The last column swaps
    /// with the first.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownColumn`] if `column` has no descriptor.
    pub fn move_right(&mut self, column: usize) -> Result<()> {
        self.move_column(column, true)
    }

    fn move_column(&mut self, column: usize, right: bool) -> Result<()> {
        if !self.config.column_reordering_enabled {
            tracing::warn!(target: targets::COLUMNS, column, "column reordering is disabled");
            return Ok(());
        }
        let positions = self.visible_positions();
        let count = positions.len();
        let Some(&from) = positions.get(column) else {
            return Err(GridError::unknown_column(column, count));
        };
        let neighbor = if right {
            (column + 1) % count
        } else {
            (column + count - 1) % count
        };
        let to = positions[neighbor];
        if from == to {
            return Ok(());
        }

        self.columns.swap(from, to);
        if let Some(sort) = &mut self.sort {
            if sort.position == from {
                sort.position = to;
            } else if sort.position == to {
                sort.position = from;
            }
        }
        self.dirty = true;
        tracing::debug!(target: targets::COLUMNS, from = column, to = neighbor, "moved column");
        Ok(())
    }

    // =========================================================================
    // Paging
    // =========================================================================

    /// Page state.
    pub fn page_state(&self) -> &PageState {
        &self.page
    }

    /// Highest page number for the active model.
    pub fn max_page(&self) -> usize {
        self.page.max_page(self.row_count())
    }

    /// Applies a pagination request. Forward and back stay within
    /// `1..=max_page`; a jump beyond the end lands on the last page.
    pub fn page_action(&mut self, action: PageAction) {
        let row_count = self.row_count();
        match action {
            PageAction::Goto(page) => self.page.goto(page, row_count),
            PageAction::Forward => {
                self.page.forward();
                self.page.clamp(row_count);
            }
            PageAction::Back => {
                self.page.back();
                self.page.clamp(row_count);
            }
            PageAction::ShowAll => {
                if !self.config.show_all_link_enabled {
                    tracing::warn!(target: targets::PAGE, "show-all is disabled; ignoring");
                    return;
                }
                self.page.show_all();
            }
            PageAction::ShowPages => self.page.show_pages(),
        }
        self.dirty = true;
        tracing::debug!(target: targets::PAGE, ?action, page = ?self.page.current_page(), "page changed");
    }

    /// Display rows currently shown.
    pub fn visible_window(&self) -> Range<usize> {
        self.page
            .visible_window(self.row_count(), self.config.paging_enabled)
    }

    /// Active-model rows currently shown, in display order.
    pub fn visible_rows(&self) -> Vec<usize> {
        self.visible_window()
            .filter_map(|display_row| self.sort_index.model_row(display_row))
            .collect()
    }

    /// Maps a row of the active model to a row of the unfiltered model.
    pub fn source_row(&self, active_row: usize) -> usize {
        self.filter.to_source_row(active_row)
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Filter state.
    pub fn filter(&self) -> &FilterState<M> {
        &self.filter
    }

    /// The active search string.
    pub fn search(&self) -> Option<&str> {
        self.filter.search()
    }

    /// Sets or clears the search string.
    ///
    /// Surrounding whitespace is ignored and an empty string clears the
    /// filter. The sort index is rebuilt over the new active model and the
    /// page returns to 1. Does nothing while filtering is disabled.
    pub fn set_filter(&mut self, search: Option<&str>) {
        if !self.config.filter_enabled {
            tracing::warn!(target: targets::FILTER, "filtering is disabled; ignoring search");
            return;
        }
        let search = search
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(str::to_string);
        if search.as_deref() == self.filter.search() {
            return;
        }

        match (&self.model, search) {
            (_, None) => self.filter.clear(),
            (Some(model), search) => self.filter.set(search, model, &self.columns),
            (None, search) => self.filter.set_search(search),
        }
        self.resort();
        self.page.reset();
        self.dirty = true;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Multi-select state.
    pub fn selection(&self) -> &MultiSelectState {
        &self.selection
    }

    /// Selected rows of the unfiltered model, ascending.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.selection.selected_rows()
    }

    /// Selects or deselects a row.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::RowOutOfRange`] for a row outside the model.
    pub fn set_selected(&mut self, row: usize, selected: bool) -> Result<()> {
        self.check_row(row)?;
        self.selection.set_selected(row, selected);
        self.dirty = true;
        Ok(())
    }

    /// Marks a row read-only: rendered checked and disabled, never cleared
    /// by a form submission.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::RowOutOfRange`] for a row outside the model.
    pub fn set_readonly(&mut self, row: usize, readonly: bool) -> Result<()> {
        self.check_row(row)?;
        self.selection.set_readonly(row, readonly);
        self.dirty = true;
        Ok(())
    }

    /// Selects every row of the active model.
    pub fn select_all(&mut self) {
        let rows: Vec<usize> = (0..self.row_count())
            .map(|row| self.filter.to_source_row(row))
            .collect();
        self.selection.select_all(rows);
        self.dirty = true;
    }

    /// Deselects every row.
    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
        self.dirty = true;
    }

    fn check_row(&self, row: usize) -> Result<()> {
        let row_count = self.unfiltered_row_count();
        if row < row_count {
            Ok(())
        } else {
            Err(GridError::row_out_of_range(row, row_count))
        }
    }

    fn reconcile(&mut self, submitted: &[usize]) {
        let window = self.visible_window();
        let filter = &self.filter;
        self.selection
            .reconcile(submitted, window, &self.sort_index, |row| filter.to_source_row(row));
        self.dirty = true;
    }

    // =========================================================================
    // Highlighting and Dirty Tracking
    // =========================================================================

    /// The highlighted row of the unfiltered model.
    pub fn highlighted_row(&self) -> Option<usize> {
        self.highlighted_row
    }

    /// Highlights a row, or clears the highlight.
    pub fn set_highlighted_row(&mut self, row: Option<usize>) {
        self.highlighted_row = row;
        self.dirty = true;
    }

    /// Returns `true` if state changed since the last [`take_dirty`](Self::take_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reports and clears the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Decodes and applies one request.
    ///
    /// Returns the event the owning page has to act on, if any; it has also
    /// been emitted on [`activated`](Self::activated).
    ///
    /// # Errors
    ///
    /// Any decoding or validation error. No state is changed in that case.
    pub fn handle(&mut self, params: &FormParams) -> Result<Option<GridEvent>> {
        let _span = tracing::debug_span!(
            target: targets::COMMAND,
            span_names::REQUEST,
            grid = self.names.id()
        )
        .entered();
        let request = CommandDecoder::new(&self.names, &self.batch_actions, self.config.multi_select)
            .decode(params)?;
        self.apply(request)
    }

    /// Applies a decoded request.
    ///
    /// Submitted checkbox states are reconciled against the rows the user
    /// saw before the command runs.
    ///
    /// # Errors
    ///
    /// [`GridError::UnknownColumn`] for a sort or move on a missing column,
    /// [`GridError::RowOutOfRange`] for a row action outside the model.
    pub fn apply(&mut self, request: DecodedRequest) -> Result<Option<GridEvent>> {
        if let Some(command) = &request.command {
            self.validate(command)?;
        }
        if let Some(submitted) = &request.selection {
            self.reconcile(submitted);
        }
        let Some(command) = request.command else {
            return Ok(None);
        };

        tracing::debug!(target: targets::COMMAND, %command, "applying command");
        let event = match command {
            Command::Sort(column) => {
                self.sort(column)?;
                None
            }
            Command::MoveLeft(column) => {
                self.move_left(column)?;
                None
            }
            Command::MoveRight(column) => {
                self.move_right(column)?;
                None
            }
            Command::Page(action) => {
                self.page_action(action);
                None
            }
            Command::RowAction { row, action } => Some(GridEvent::RowAction { row, action }),
            Command::MultiSelectAction(action) => Some(GridEvent::BatchAction {
                action,
                selected: self.selection.selected_rows(),
            }),
        };

        if let Some(event) = &event {
            self.activated.emit(event.clone());
        }
        Ok(event)
    }

    fn validate(&self, command: &Command) -> Result<()> {
        match command {
            Command::Sort(column) if self.config.sorting_enabled => {
                self.position_of(*column).map(|_| ())
            }
            Command::MoveLeft(column) | Command::MoveRight(column)
                if self.config.column_reordering_enabled =>
            {
                self.position_of(*column).map(|_| ())
            }
            Command::RowAction { row, .. } => self.check_row(*row),
            _ => Ok(()),
        }
    }
}

fn sort_rows<M: DataModel>(
    columns: &mut [Box<dyn ColumnDescriptor<M>>],
    sort_index: &mut SortIndex,
    model: &M,
    sort: SortState,
) {
    for (position, column) in columns.iter_mut().enumerate() {
        if position == sort.position {
            column.on_sort_start(model);
        } else {
            column.on_other_column_sorted();
        }
    }
    let Some(column) = columns.get(sort.position) else {
        return;
    };
    sort_index.sort_by(|a, b| {
        let ordering = column.compare(model, a, b);
        match sort.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionColumn, DefaultColumn, TableDataModel, Value};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Model = TableDataModel<(i64, String)>;

    fn create_model(rows: usize) -> Model {
        let rows = (0..rows)
            .map(|i| (((i * 7) % 25) as i64, format!("name {i}")))
            .collect();
        TableDataModel::new(rows, 2, |row: &(i64, String), column| match column {
            0 => Value::Int(row.0),
            _ => Value::from(&row.1),
        })
    }

    fn create_grid(config: GridConfig) -> GridController<Model> {
        GridController::new("t", config)
            .with_column(DefaultColumn::new("Value", 0))
            .with_column(DefaultColumn::new("Name", 1))
            .with_column(ActionColumn::new("", "Edit", "edit"))
    }

    fn values(grid: &GridController<Model>) -> Vec<i64> {
        let model = grid.active_model().unwrap();
        grid.visible_rows()
            .into_iter()
            .map(|row| model.value_at(row, 0).as_int().unwrap())
            .collect()
    }

    #[test]
    fn test_sort_flips_on_same_column() {
        let mut grid = create_grid(GridConfig::new().with_page_size(10));
        grid.set_model(create_model(25)).unwrap();

        grid.sort(0).unwrap();
        assert_eq!(values(&grid), (0..10).collect::<Vec<_>>());
        assert_eq!(grid.sort_order(), Some(SortOrder::Ascending));

        grid.sort(0).unwrap();
        assert_eq!(values(&grid), (15..25).rev().collect::<Vec<_>>());
        assert_eq!(grid.sort_order(), Some(SortOrder::Descending));

        grid.sort(1).unwrap();
        assert_eq!(grid.sort_column(), Some(1));
        assert_eq!(grid.sort_order(), Some(SortOrder::Ascending));
    }

    #[test]
    fn test_sort_on_missing_column_fails() {
        let mut grid = create_grid(GridConfig::new());
        grid.set_model(create_model(3)).unwrap();
        assert!(matches!(
            grid.sort(3),
            Err(GridError::UnknownColumn { column: 3, count: 3 })
        ));
    }

    #[test]
    fn test_sort_disabled_is_noop() {
        let mut grid = create_grid(GridConfig::new().with_sorting(false));
        grid.set_model(create_model(5)).unwrap();
        grid.take_dirty();
        grid.sort(7).unwrap();
        assert_eq!(grid.sort_column(), None);
        assert!(!grid.is_dirty());
    }

    #[test]
    fn test_unsortable_column_is_ignored() {
        let mut grid = create_grid(GridConfig::new());
        grid.set_model(create_model(5)).unwrap();
        grid.sort(2).unwrap();
        assert_eq!(grid.sort_column(), None);
    }

    #[test]
    fn test_default_sort_requires_columns() {
        let config = GridConfig::new().with_default_sort(0, false);
        let mut grid: GridController<Model> = GridController::new("t", config.clone());
        assert!(matches!(
            grid.set_model(create_model(3)),
            Err(GridError::UnknownColumn { .. })
        ));
        assert!(grid.model().is_none());

        let mut grid = create_grid(config);
        grid.set_model(create_model(25)).unwrap();
        assert_eq!(grid.sort_order(), Some(SortOrder::Descending));
        assert_eq!(values(&grid)[0], 24);
    }

    #[test]
    fn test_move_tracks_sort_column() {
        let mut grid = create_grid(GridConfig::new());
        grid.set_model(create_model(5)).unwrap();
        grid.sort(1).unwrap();

        grid.move_left(1).unwrap();
        assert_eq!(grid.visible_columns().next().unwrap().header(), "Name");
        assert_eq!(grid.sort_column(), Some(0));

        // Moving left from the first column wraps to the last.
        grid.move_left(0).unwrap();
        let headers: Vec<_> = grid.visible_columns().map(|c| c.header().to_string()).collect();
        assert_eq!(headers, vec!["", "Value", "Name"]);
        assert_eq!(grid.sort_column(), Some(2));
    }

    #[test]
    fn test_move_disabled_is_noop() {
        let mut grid = create_grid(GridConfig::new().with_column_reordering(false));
        grid.move_right(0).unwrap();
        assert_eq!(grid.visible_columns().next().unwrap().header(), "Value");
    }

    #[test]
    fn test_paging_commands() {
        let mut grid = create_grid(GridConfig::new().with_page_size(10));
        grid.set_model(create_model(25)).unwrap();

        grid.page_action(PageAction::Back);
        assert_eq!(grid.page_state().current_page(), Some(1));
        grid.page_action(PageAction::Goto(9));
        assert_eq!(grid.page_state().current_page(), Some(3));
        grid.page_action(PageAction::Forward);
        assert_eq!(grid.visible_window(), 20..25);
        grid.page_action(PageAction::ShowAll);
        assert_eq!(grid.visible_window(), 0..25);
        grid.page_action(PageAction::ShowPages);
        assert_eq!(grid.visible_window(), 0..10);
    }

    #[test]
    fn test_model_shrink_clamps_page() {
        let mut grid = create_grid(GridConfig::new().with_page_size(10));
        grid.set_model(create_model(25)).unwrap();
        grid.page_action(PageAction::Goto(3));
        grid.update_model(|model| {
            while model.row_count() > 12 {
                model.remove_row(0);
            }
        });
        assert_eq!(grid.page_state().current_page(), Some(2));
        assert_eq!(grid.visible_window(), 10..12);
    }

    #[test]
    fn test_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.toml");
        std::fs::write(&path, "page_size = 7\nmulti_select = true\n").unwrap();

        let grid: GridController<Model> = GridController::from_config_file("t", &path).unwrap();
        assert_eq!(grid.config().page_size(), 7);
        assert!(grid.config().multi_select);

        let missing = GridController::<Model>::from_config_file("t", dir.path().join("none.toml"));
        assert!(matches!(missing, Err(GridError::Config(_))));

        std::fs::write(&path, "page_size = \"ten\"\n").unwrap();
        let invalid = GridController::<Model>::from_config_file("t", &path);
        assert!(matches!(invalid, Err(GridError::Config(_))));
    }

    #[test]
    fn test_update_model_clears_marks_when_rows_shift() {
        let mut grid = create_grid(GridConfig::new().with_multi_select(true));
        grid.set_model(create_model(5)).unwrap();
        grid.set_selected(3, true).unwrap();
        grid.set_readonly(4, true).unwrap();
        grid.set_highlighted_row(Some(2));

        grid.update_model(|model| {
            model.remove_row(0);
        });

        assert!(grid.selected_rows().is_empty());
        assert!(grid.selection().readonly_rows().is_empty());
        assert_eq!(grid.highlighted_row(), None);
    }

    #[test]
    fn test_update_model_keeps_marks_for_same_row_count() {
        let mut grid = create_grid(GridConfig::new().with_multi_select(true));
        grid.set_model(create_model(5)).unwrap();
        grid.set_selected(3, true).unwrap();
        grid.set_highlighted_row(Some(2));

        grid.update_model(|model| {
            model.modify_row(3, |row| row.1 = "renamed".to_string());
        });

        assert_eq!(grid.selected_rows(), vec![3]);
        assert_eq!(grid.highlighted_row(), Some(2));
        assert_eq!(grid.model().unwrap().value_at(3, 1), Value::from("renamed"));
    }

    #[test]
    fn test_set_model_resets_state() {
        let mut grid = create_grid(GridConfig::new().with_page_size(10).with_multi_select(true));
        grid.set_model(create_model(25)).unwrap();
        grid.set_selected(3, true).unwrap();
        grid.page_action(PageAction::Goto(2));

        grid.set_model(create_model(25)).unwrap();
        assert!(grid.selected_rows().is_empty());
        assert_eq!(grid.page_state().current_page(), Some(1));
    }

    #[test]
    fn test_set_model_keeps_page_when_requested() {
        let config = GridConfig::new()
            .with_page_size(10)
            .with_multi_select(true)
            .with_preserve_page_on_model_change(true);
        let mut grid = create_grid(config);
        grid.set_model(create_model(25)).unwrap();
        grid.page_action(PageAction::Goto(3));

        grid.set_model(create_model(15)).unwrap();
        assert_eq!(grid.page_state().current_page(), Some(2));
    }

    #[test]
    fn test_filter_and_clear() {
        let mut grid = create_grid(GridConfig::new().with_page_size(10));
        grid.set_model(create_model(25)).unwrap();
        grid.sort(0).unwrap();
        grid.page_action(PageAction::Goto(2));

        grid.set_filter(Some("  name 1"));
        assert_eq!(grid.row_count(), 11);
        assert_eq!(grid.page_state().current_page(), Some(1));
        assert!(grid.sort_index().is_permutation());
        let sorted = values(&grid);
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));

        grid.set_filter(Some(""));
        assert_eq!(grid.row_count(), 25);
        assert!(grid.search().is_none());
        assert!(grid.filter().filtered().is_none());
        assert!(grid.filter().source_rows().is_empty());
    }

    #[test]
    fn test_filter_disabled_is_noop() {
        let mut grid = create_grid(GridConfig::new().with_filter(false));
        grid.set_model(create_model(5)).unwrap();
        grid.set_filter(Some("name 1"));
        assert_eq!(grid.row_count(), 5);
    }

    #[test]
    fn test_row_action_out_of_range_changes_nothing() {
        let mut grid = create_grid(GridConfig::new());
        grid.set_model(create_model(5)).unwrap();
        grid.take_dirty();

        let result = grid.handle(&FormParams::from_query("t_r=5&t_a=edit"));
        assert!(matches!(
            result,
            Err(GridError::RowOutOfRange { row: 5, row_count: 5 })
        ));
        assert!(!grid.is_dirty());
    }

    #[test]
    fn test_row_action_emits_event() {
        let mut grid = create_grid(GridConfig::new());
        grid.set_model(create_model(5)).unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        grid.activated.connect(move |event| {
            if matches!(event, GridEvent::RowAction { row: 4, .. }) {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        let event = grid.handle(&FormParams::from_query("t_r=4&t_a=edit")).unwrap();
        assert_eq!(
            event,
            Some(GridEvent::RowAction {
                row: 4,
                action: "edit".into()
            })
        );
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reconcile_runs_before_page_command() {
        let config = GridConfig::new().with_page_size(10).with_multi_select(true);
        let mut grid = create_grid(config).with_batch_action(BatchAction::new("del", "Delete"));
        grid.set_model(create_model(25)).unwrap();

        grid.handle(&FormParams::from_query("t_cmd=pg&t_param=f&t_form=1&t_ms=2&t_ms=15"))
            .unwrap();
        assert_eq!(grid.selected_rows(), vec![2]);
        assert_eq!(grid.page_state().current_page(), Some(2));

        // Row 2 is off-page now and survives an empty submission.
        grid.handle(&FormParams::from_query("t_cmd=pg&t_param=b&t_form=1"))
            .unwrap();
        assert_eq!(grid.selected_rows(), vec![2]);

        let event = grid
            .handle(&FormParams::from_query("t_form=1&t_ms=2&t_ms=3&t_ma_del=Delete"))
            .unwrap();
        assert_eq!(
            event,
            Some(GridEvent::BatchAction {
                action: "del".into(),
                selected: vec![2, 3]
            })
        );
    }

    #[test]
    fn test_batch_param_ignored_without_multi_select() {
        let mut grid = create_grid(GridConfig::new().with_page_size(10))
            .with_batch_action(BatchAction::new("del", "Delete"));
        grid.set_model(create_model(25)).unwrap();
        grid.set_selected(1, true).unwrap();

        let event = grid.handle(&FormParams::from_query("t_ma_del=Delete")).unwrap();
        assert_eq!(event, None);
        assert_eq!(grid.selected_rows(), vec![1]);
    }

    #[test]
    fn test_selection_survives_filter() {
        let config = GridConfig::new().with_multi_select(true);
        let mut grid = create_grid(config).with_batch_action(BatchAction::new("del", "Delete"));
        grid.set_model(create_model(5)).unwrap();
        grid.set_selected(0, true).unwrap();

        grid.set_filter(Some("name 3"));
        grid.handle(&FormParams::from_query("t_cmd=zz&t_form=1&t_ms=3"))
            .unwrap();
        grid.set_filter(None);

        assert_eq!(grid.selected_rows(), vec![0, 3]);
    }

    #[test]
    fn test_admin_selection_toggles() {
        let mut grid = create_grid(GridConfig::new().with_multi_select(true));
        grid.set_model(create_model(4)).unwrap();
        grid.select_all();
        assert_eq!(grid.selected_rows(), vec![0, 1, 2, 3]);
        grid.clear_selection();
        assert!(grid.selected_rows().is_empty());
        assert!(grid.set_readonly(4, true).is_err());
    }
}
