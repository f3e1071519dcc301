//! Prelude module for Horizon Grid.
//!
//! ```
//! use horizon_grid::prelude::*;
//! ```

// ============================================================================
// Configuration and Errors
// ============================================================================

pub use crate::error::{GridError, Result};
pub use horizon_grid_core::{ConnectionId, GridConfig, Signal};

// ============================================================================
// Data Model and Columns
// ============================================================================

pub use crate::model::{
    ActionColumn, Alignment, CellRenderer, ColumnDescriptor, DataModel, DefaultColumn,
    TableDataModel, Value,
};

// ============================================================================
// Grid
// ============================================================================

pub use crate::table::{
    BatchAction, Command, FormParams, GridController, GridEvent, GridRenderer, PageAction,
    SortOrder,
};
