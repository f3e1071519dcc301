//! Core systems for Horizon Grid.
//!
//! This crate provides the infrastructure shared by the grid engine:
//!
//! - **Configuration**: [`GridConfig`], loadable from TOML or built in code
//! - **Logging**: `tracing` target and span names for each grid subsystem
//! - **Signal/Slot System**: [`Signal`] for publishing grid events to the owning page
//!
//! # Configuration Example
//!
//! ```
//! use horizon_grid_core::GridConfig;
//!
//! let config = GridConfig::from_toml_str(r#"
//! page_size = 10
//! multi_select = true
//! "#).unwrap();
//!
//! assert_eq!(config.page_size(), 10);
//! assert!(config.multi_select);
//! ```
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! let row_clicked = Signal::<usize>::new();
//! let conn_id = row_clicked.connect(|row| {
//!     println!("Row {} clicked", row);
//! });
//!
//! row_clicked.emit(3);
//! row_clicked.disconnect(conn_id);
//! ```

pub mod config;
pub mod logging;
pub mod signal;

pub use config::{ConfigError, ConfigResult, GridConfig};
pub use signal::{ConnectionId, Signal};
