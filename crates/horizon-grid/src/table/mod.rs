//! View side of the grid.
//!
//! - `PageState`: current page, page size and show-all mode
//! - `MultiSelectState`: selected and read-only rows across pages
//! - `FilterState`: search string and the filtered copy of the model
//! - `CommandDecoder`: request parameters to [`Command`]
//! - `GridController`: owns the state above and applies commands
//! - `GridRenderer`: controller state to HTML
//!
//! A request flows through them in that order:
//!
//! ```text
//! FormParams ──decode──> Command ──apply──> GridController ──render──> HTML
//!                                              │
//!                                              └──> activated: Signal<GridEvent>
//! ```

mod command;
mod controller;
mod export;
mod filter;
mod page;
mod render;
mod selection;

pub use command::{
    BatchAction, Command, CommandDecoder, DecodedRequest, FormParams, PageAction, ParamNames,
    tokens,
};
pub use controller::{GridController, GridEvent, SortOrder};
pub use filter::{FilterState, cell_text, matching_rows};
pub use page::{PageState, page_links};
pub use render::GridRenderer;
pub use selection::MultiSelectState;
