//! Horizon Grid - a server-rendered, stateful data grid.
//!
//! A grid is bound to one on-screen table of one user. It sorts, pages,
//! filters and multi-selects rows entirely on the server, renders itself to
//! HTML, and reads the next request back from the parameters its own markup
//! produced.
//!
//! # Example
//!
//! ```
//! use horizon_grid::prelude::*;
//!
//! let people = vec![("Ada", 36), ("Grace", 45), ("Linus", 28)];
//! let model = TableDataModel::new(people, 2, |row: &(&str, i64), column| match column {
//!     0 => Value::from(row.0),
//!     _ => Value::Int(row.1),
//! });
//!
//! let mut grid = GridController::new("people", GridConfig::new().with_page_size(2))
//!     .with_column(DefaultColumn::new("Name", 0).with_action("open"))
//!     .with_column(DefaultColumn::new("Age", 1).with_alignment(Alignment::Right));
//! grid.set_model(model)?;
//!
//! // A click on the "Age" header.
//! grid.handle(&FormParams::from_query("people_cmd=cid&people_param=1"))?;
//! let html = grid.render("/people")?;
//! assert!(html.contains("aria-sort=\"ascending\""));
//!
//! // A click on a name.
//! let event = grid.handle(&FormParams::from_query("people_r=1&people_a=open"))?;
//! assert_eq!(event, Some(GridEvent::RowAction { row: 1, action: "open".into() }));
//! # Ok::<(), horizon_grid::GridError>(())
//! ```

pub mod error;
pub mod markup;
pub mod model;
pub mod prelude;
pub mod table;

pub use error::{GridError, Result};
pub use horizon_grid_core::{GridConfig, Signal, logging};
pub use model::{ColumnDescriptor, DataModel, Value};
pub use table::{GridController, GridEvent, GridRenderer};
