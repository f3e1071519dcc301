//! Grid configuration.
//!
//! [`GridConfig`] holds the grid-level capability flags and presentation
//! options. It can be built fluently in code or loaded from TOML; every
//! field is optional in TOML and falls back to its default.
//!
//! ```toml
//! page_size = 25
//! sorting_enabled = true
//! default_sort_column = 0
//! multi_select = true
//! empty_message = "No participants yet"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::logging::targets;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading a grid configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse or schema error.
    #[error("Invalid grid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize the configuration.
    #[error("Failed to serialize grid configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// File I/O error.
    #[error("Failed to read grid configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const DEFAULT_PAGE_SIZE: usize = 20;

/// Grid-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Rows per page. Zero is treated as one.
    pub page_size: usize,
    /// Whether the rows are split into pages at all.
    pub paging_enabled: bool,
    /// Whether the "show all" link is offered next to the page links.
    pub show_all_link_enabled: bool,

    /// Whether sort commands are honored.
    pub sorting_enabled: bool,
    /// Visible-column index sorted when the first model is attached.
    pub default_sort_column: Option<usize>,
    /// Direction of the initial sort.
    pub default_sort_ascending: bool,

    /// Whether move-left/move-right affordances are offered in the header.
    pub column_moving_enabled: bool,
    /// Whether move commands are applied at all.
    pub column_reordering_enabled: bool,

    /// Whether rows carry checkboxes and batch actions.
    pub multi_select: bool,
    /// Keep the current page when a new model is installed (multi-select only).
    pub preserve_page_on_model_change: bool,

    /// Whether free-text filtering is honored.
    pub filter_enabled: bool,

    /// Whether the header row is rendered.
    pub display_header: bool,
    /// Whether the row count caption is rendered.
    pub display_row_count: bool,
    /// Message rendered in place of the body when there are no rows.
    pub empty_message: String,
    /// Extra CSS class for the wrapping element.
    pub css_class: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            paging_enabled: true,
            show_all_link_enabled: true,
            sorting_enabled: true,
            default_sort_column: None,
            default_sort_ascending: true,
            column_moving_enabled: false,
            column_reordering_enabled: true,
            multi_select: false,
            preserve_page_on_model_change: false,
            filter_enabled: true,
            display_header: true,
            display_row_count: true,
            empty_message: "No entries".to_string(),
            css_class: None,
        }
    }
}

impl GridConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        tracing::debug!(target: targets::CONFIG, ?config, "parsed grid configuration");
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes the configuration to TOML text.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Effective page size, never zero.
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Enables or disables paging.
    pub fn with_paging(mut self, enabled: bool) -> Self {
        self.paging_enabled = enabled;
        self
    }

    /// Enables or disables the "show all" link.
    pub fn with_show_all_link(mut self, enabled: bool) -> Self {
        self.show_all_link_enabled = enabled;
        self
    }

    /// Enables or disables sorting.
    pub fn with_sorting(mut self, enabled: bool) -> Self {
        self.sorting_enabled = enabled;
        self
    }

    /// Sets the column sorted when the first model is attached.
    pub fn with_default_sort(mut self, column: usize, ascending: bool) -> Self {
        self.default_sort_column = Some(column);
        self.default_sort_ascending = ascending;
        self
    }

    /// Offers move-left/move-right affordances in the header.
    pub fn with_column_moving(mut self, enabled: bool) -> Self {
        self.column_moving_enabled = enabled;
        self
    }

    /// Allows or forbids applying column moves.
    pub fn with_column_reordering(mut self, enabled: bool) -> Self {
        self.column_reordering_enabled = enabled;
        self
    }

    /// Enables or disables multi-select checkboxes.
    pub fn with_multi_select(mut self, enabled: bool) -> Self {
        self.multi_select = enabled;
        self
    }

    /// Keeps the current page across model replacement in multi-select grids.
    pub fn with_preserve_page_on_model_change(mut self, enabled: bool) -> Self {
        self.preserve_page_on_model_change = enabled;
        self
    }

    /// Enables or disables filtering.
    pub fn with_filter(mut self, enabled: bool) -> Self {
        self.filter_enabled = enabled;
        self
    }

    /// Shows or hides the header row.
    pub fn with_header(mut self, display: bool) -> Self {
        self.display_header = display;
        self
    }

    /// Shows or hides the row count caption.
    pub fn with_row_count(mut self, display: bool) -> Self {
        self.display_row_count = display;
        self
    }

    /// Sets the message shown for an empty table.
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Sets an extra CSS class on the wrapping element.
    pub fn with_css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class = Some(class.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.page_size(), 20);
        assert!(config.paging_enabled);
        assert!(config.sorting_enabled);
        assert!(!config.multi_select);
        assert!(config.default_sort_column.is_none());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = GridConfig::from_toml_str(
            r#"
            page_size = 10
            multi_select = true
            default_sort_column = 2
            default_sort_ascending = false
            "#,
        )
        .unwrap();

        assert_eq!(config.page_size(), 10);
        assert!(config.multi_select);
        assert_eq!(config.default_sort_column, Some(2));
        assert!(!config.default_sort_ascending);
        assert!(config.paging_enabled);
        assert_eq!(config.empty_message, "No entries");
    }

    #[test]
    fn test_zero_page_size_is_normalized() {
        let config = GridConfig::new().with_page_size(0);
        assert_eq!(config.page_size(), 1);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let err = GridConfig::from_toml_str("page_size = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GridConfig::new()
            .with_page_size(5)
            .with_css_class("o_members")
            .with_default_sort(1, false);
        let text = config.to_toml_string().unwrap();
        assert_eq!(GridConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = 7\nfilter_enabled = false").unwrap();

        let config = GridConfig::load(file.path()).unwrap();
        assert_eq!(config.page_size(), 7);
        assert!(!config.filter_enabled);
    }

    #[test]
    fn test_load_missing_file() {
        let err = GridConfig::load("/nonexistent/grid.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
