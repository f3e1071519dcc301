//! Logging facilities for Horizon Grid.
//!
//! Horizon Grid uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in the hosting application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_grid::command=debug,horizon_grid::sort=debug")
//!     .init();
//! ```
//!
//! Every event emitted by the grid carries one of the [`targets`] below, so a
//! single subsystem can be switched on without the noise of the others.

/// Span names used throughout Horizon Grid for tracing.
pub mod span_names {
    /// Handling of one incoming request (decode + apply).
    pub const REQUEST: &str = "horizon_grid::request";
    /// One render pass over the grid state.
    pub const RENDER: &str = "horizon_grid::render";
    /// Building the filtered copy of the model.
    pub const FILTER: &str = "horizon_grid::filter";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Sort engine target.
    pub const SORT: &str = "horizon_grid::sort";
    /// Pagination target.
    pub const PAGE: &str = "horizon_grid::page";
    /// Multi-select reconciliation target.
    pub const SELECTION: &str = "horizon_grid::selection";
    /// Filter engine target.
    pub const FILTER: &str = "horizon_grid::filter";
    /// Command decoding and dispatch target.
    pub const COMMAND: &str = "horizon_grid::command";
    /// Markup rendering target.
    pub const RENDER: &str = "horizon_grid::render";
    /// Configuration loading target.
    pub const CONFIG: &str = "horizon_grid::config";
    /// Column reordering target.
    pub const COLUMNS: &str = "horizon_grid::columns";
}
