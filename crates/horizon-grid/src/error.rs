//! Error types for the grid engine.
//!
//! Every variant here is a hard failure of the request that triggered it.
//! Requests that are merely not applicable (a sort while sorting is switched
//! off, an unknown command token) are ignored and never produce an error.

use std::path::PathBuf;

use horizon_grid_core::ConfigError;

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors that can occur while configuring, driving, or rendering a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A column index has no descriptor behind it.
    #[error("No column descriptor at index {column} (grid has {count} visible columns)")]
    UnknownColumn { column: usize, count: usize },

    /// A row-action link addressed a row outside the model.
    #[error("Row {row} is out of range (model has {row_count} rows)")]
    RowOutOfRange { row: usize, row_count: usize },

    /// A submitted row id is not an integer.
    #[error("Invalid row id '{value}'")]
    InvalidRowId { value: String },

    /// A command arrived with an argument it cannot use.
    #[error("Invalid argument '{value}' for command '{command}'")]
    InvalidArgument { command: String, value: String },

    /// Multi-select is enabled but nothing can be done with a selection.
    #[error("Multi-select is enabled but no batch actions are registered")]
    NoBatchActions,

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// CSV export failed.
    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),

    /// File I/O error.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GridError {
    /// Create an unknown-column error.
    pub fn unknown_column(column: usize, count: usize) -> Self {
        Self::UnknownColumn { column, count }
    }

    /// Create a row-out-of-range error.
    pub fn row_out_of_range(row: usize, row_count: usize) -> Self {
        Self::RowOutOfRange { row, row_count }
    }

    /// Create an invalid-row-id error.
    pub fn invalid_row_id(value: impl Into<String>) -> Self {
        Self::InvalidRowId {
            value: value.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(command: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidArgument {
            command: command.into(),
            value: value.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
