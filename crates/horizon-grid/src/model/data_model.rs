//! The data source contract and a ready-made table implementation.
//!
//! The grid never owns the meaning of a row. It asks a [`DataModel`] for the
//! number of rows and columns and for individual cell [`Value`]s, and the only
//! mutation it ever performs is filling an empty copy of the model with the
//! rows that survive a filter.

use std::fmt;
use std::sync::Arc;

use super::value::Value;

/// A row/column data source displayed by a grid.
///
/// # Example
///
/// ```
/// use horizon_grid::model::{DataModel, Value};
///
/// #[derive(Clone, Default)]
/// struct Names(Vec<String>);
///
/// impl DataModel for Names {
///     type Row = String;
///
///     fn row_count(&self) -> usize { self.0.len() }
///     fn column_count(&self) -> usize { 1 }
///     fn value_at(&self, row: usize, _column: usize) -> Value {
///         self.0.get(row).map(Value::from).unwrap_or_default()
///     }
///     fn row(&self, row: usize) -> Option<&String> { self.0.get(row) }
///     fn create_empty_copy(&self) -> Self { Names(Vec::new()) }
///     fn set_rows(&mut self, rows: Vec<String>) { self.0 = rows; }
/// }
/// ```
pub trait DataModel {
    /// The opaque row object.
    type Row: Clone;

    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Number of data columns.
    fn column_count(&self) -> usize;

    /// Value of one cell. Out-of-range positions return `Value::None`.
    fn value_at(&self, row: usize, column: usize) -> Value;

    /// The row object at `row`.
    fn row(&self, row: usize) -> Option<&Self::Row>;

    /// A model of the same shape holding no rows.
    ///
    /// Used to materialize the filtered subset of this model.
    fn create_empty_copy(&self) -> Self
    where
        Self: Sized;

    /// Replaces all rows.
    fn set_rows(&mut self, rows: Vec<Self::Row>);
}

/// Type alias for a cell data extractor function.
pub type CellExtractor<T> = Arc<dyn Fn(&T, usize) -> Value + Send + Sync>;

/// A table model backed by a vector of rows.
///
/// Column access is done via an extractor function that maps a row and a
/// column index to a [`Value`].
///
/// # Example
///
/// ```
/// use horizon_grid::model::{DataModel, TableDataModel, Value};
///
/// #[derive(Clone)]
/// struct Member {
///     name: String,
///     points: i64,
/// }
///
/// let model = TableDataModel::new(
///     vec![
///         Member { name: "Alice".into(), points: 12 },
///         Member { name: "Bob".into(), points: 7 },
///     ],
///     2,
///     |member: &Member, column| match column {
///         0 => Value::from(&member.name),
///         1 => Value::from(member.points),
///         _ => Value::None,
///     },
/// );
///
/// assert_eq!(model.row_count(), 2);
/// assert_eq!(model.value_at(1, 1), Value::Int(7));
/// ```
pub struct TableDataModel<T> {
    rows: Vec<T>,
    column_count: usize,
    cell_extractor: CellExtractor<T>,
}

impl<T> TableDataModel<T> {
    /// Creates a new table model.
    ///
    /// # Arguments
    ///
    /// * `rows` - The row data
    /// * `column_count` - Number of columns
    /// * `cell_extractor` - Function to extract cell data: (row_data, column) -> value
    pub fn new<F>(rows: Vec<T>, column_count: usize, cell_extractor: F) -> Self
    where
        F: Fn(&T, usize) -> Value + Send + Sync + 'static,
    {
        Self {
            rows,
            column_count,
            cell_extractor: Arc::new(cell_extractor),
        }
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Returns `true` if the model has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: T) {
        self.rows.push(row);
    }

    /// Removes and returns the row at `index`, if it exists.
    pub fn remove_row(&mut self, index: usize) -> Option<T> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// Provides mutable access to a row via a closure.
    pub fn modify_row<F, R>(&mut self, index: usize, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.rows.get_mut(index).map(f)
    }
}

impl<T: Clone> DataModel for TableDataModel<T> {
    type Row = T;

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.column_count
    }

    fn value_at(&self, row: usize, column: usize) -> Value {
        if column >= self.column_count {
            return Value::None;
        }
        self.rows
            .get(row)
            .map(|r| (self.cell_extractor)(r, column))
            .unwrap_or_default()
    }

    fn row(&self, row: usize) -> Option<&T> {
        self.rows.get(row)
    }

    fn create_empty_copy(&self) -> Self {
        Self {
            rows: Vec::new(),
            column_count: self.column_count,
            cell_extractor: self.cell_extractor.clone(),
        }
    }

    fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
    }
}

impl<T: fmt::Debug> fmt::Debug for TableDataModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDataModel")
            .field("rows", &self.rows)
            .field("column_count", &self.column_count)
            .finish_non_exhaustive()
    }
}
