//! Data side of the grid.
//!
//! - `DataModel`: the row/column data source contract
//! - `TableDataModel`: a `Vec`-backed model with a cell extractor
//! - `Value`: the value of one cell
//! - `ColumnDescriptor`: per-column ordering, rendering and row action
//! - `SortIndex`: the display-row to model-row permutation
//!
//! ```text
//! ┌─────────────┐  value_at   ┌──────────────────┐  compare/render  ┌───────────┐
//! │  DataModel  │────────────>│ ColumnDescriptor │─────────────────>│ SortIndex │
//! └─────────────┘             └──────────────────┘                  └───────────┘
//! ```

mod column;
mod data_model;
mod sort_index;
mod value;

pub use column::{ActionColumn, Alignment, CellRenderer, ColumnDescriptor, DefaultColumn, ValueFn};
pub use data_model::{CellExtractor, DataModel, TableDataModel};
pub use sort_index::SortIndex;
pub use value::{Value, compare_values};
