//! Column descriptors.
//!
//! A column descriptor decides how one column of the grid orders, renders,
//! and links its cells. The grid talks to descriptors only through
//! [`ColumnDescriptor`]; [`DefaultColumn`] and [`ActionColumn`] cover the
//! common cases.
//!
//! # Sort hooks
//!
//! Before every sort the active column receives
//! [`on_sort_start`](ColumnDescriptor::on_sort_start) and every other column
//! receives [`on_other_column_sorted`](ColumnDescriptor::on_other_column_sorted).
//! A column can use this to compute its sort keys once per sort instead of
//! once per comparison, and to drop them again when another column takes over.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::data_model::DataModel;
use super::value::{Value, compare_values};
use crate::markup::escape_html;

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Left-aligned (default).
    #[default]
    Left,
    /// Right-aligned, typically for numbers.
    Right,
    /// Centered, typically for icons and flags.
    Center,
}

impl Alignment {
    /// CSS class used by the renderer for this alignment.
    pub fn css_class(self) -> &'static str {
        match self {
            Alignment::Left => "o_align_left",
            Alignment::Right => "o_align_right",
            Alignment::Center => "o_align_center",
        }
    }
}

/// Describes one column of a grid over a model of type `M`.
///
/// Row arguments are always rows of the model passed alongside them.
pub trait ColumnDescriptor<M: DataModel> {
    /// Header label (plain text).
    fn header(&self) -> &str;

    /// Cell alignment.
    fn alignment(&self) -> Alignment {
        Alignment::Left
    }

    /// Whether the header offers sorting by this column.
    fn is_sortable(&self) -> bool {
        true
    }

    /// Whether the column is rendered. Invisible columns are also skipped by
    /// the filter engine.
    fn is_visible(&self) -> bool {
        true
    }

    /// Row action triggered by clicking a cell of this column, if any.
    fn action(&self) -> Option<&str> {
        None
    }

    /// Orders two rows of `model`.
    fn compare(&self, model: &M, row_a: usize, row_b: usize) -> Ordering;

    /// Cell markup for `row`. Text content must already be escaped.
    fn render(&self, model: &M, row: usize) -> String;

    /// Human-meaningful label for cells whose markup carries none (icon or
    /// CSS-only columns). Preferred over [`render`](Self::render) by the
    /// filter engine.
    fn hover_text(&self, _model: &M, _row: usize) -> Option<String> {
        None
    }

    /// The model was replaced or changed in place.
    fn on_model_changed(&mut self, _model: &M) {}

    /// A sort by this column is about to run over `model`.
    fn on_sort_start(&mut self, _model: &M) {}

    /// A sort by another column is about to run.
    fn on_other_column_sorted(&mut self) {}
}

/// Type alias for a function deriving text from a cell value.
pub type ValueFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// How a [`DefaultColumn`] turns a cell value into markup.
#[derive(Clone, Default)]
pub enum CellRenderer {
    /// The value's display text, escaped.
    #[default]
    PlainText,
    /// An empty element styled by a CSS class derived from the value, with an
    /// optional hover label that stands in for the value when filtering.
    CssOnly {
        /// Derives the CSS class.
        class: ValueFn,
        /// Derives the hover label.
        hover_text: Option<ValueFn>,
    },
    /// Arbitrary markup produced from the value. The function is responsible
    /// for escaping.
    Custom(ValueFn),
}

impl CellRenderer {
    /// Creates a CSS-only renderer without hover text.
    pub fn css_only<F>(class: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        CellRenderer::CssOnly {
            class: Arc::new(class),
            hover_text: None,
        }
    }

    /// Creates a CSS-only renderer with a hover label.
    pub fn css_with_hover<F, H>(class: F, hover_text: H) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
        H: Fn(&Value) -> String + Send + Sync + 'static,
    {
        CellRenderer::CssOnly {
            class: Arc::new(class),
            hover_text: Some(Arc::new(hover_text)),
        }
    }

    /// Creates a custom markup renderer.
    pub fn custom<F>(render: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        CellRenderer::Custom(Arc::new(render))
    }

    /// Renders `value` to markup.
    pub fn render(&self, value: &Value) -> String {
        match self {
            CellRenderer::PlainText => escape_html(&value.display_text()),
            CellRenderer::CssOnly { class, hover_text } => {
                let class = escape_html(&class(value));
                match hover_text {
                    Some(hover) => format!(
                        "<span class=\"{class}\" title=\"{}\"></span>",
                        escape_html(&hover(value))
                    ),
                    None => format!("<span class=\"{class}\"></span>"),
                }
            }
            CellRenderer::Custom(render) => render(value),
        }
    }

    /// Hover label for `value`, for renderers that have one.
    pub fn hover_text(&self, value: &Value) -> Option<String> {
        match self {
            CellRenderer::CssOnly {
                hover_text: Some(hover),
                ..
            } => Some(hover(value)),
            _ => None,
        }
    }
}

impl fmt::Debug for CellRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellRenderer::PlainText => write!(f, "PlainText"),
            CellRenderer::CssOnly { hover_text, .. } => f
                .debug_struct("CssOnly")
                .field("hover_text", &hover_text.is_some())
                .finish_non_exhaustive(),
            CellRenderer::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// A column showing one data column of the model.
///
/// # Example
///
/// ```
/// use horizon_grid::model::{Alignment, CellRenderer, DefaultColumn};
///
/// let name = DefaultColumn::new("Name", 0).with_action("open");
/// let points = DefaultColumn::new("Points", 1).with_alignment(Alignment::Right);
/// let status = DefaultColumn::new("Status", 2).with_renderer(CellRenderer::css_with_hover(
///     |v| format!("o_status_{}", v.display_text()),
///     |v| v.display_text(),
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct DefaultColumn {
    header: String,
    data_column: usize,
    alignment: Alignment,
    sortable: bool,
    visible: bool,
    action: Option<String>,
    renderer: CellRenderer,
    /// Sort keys for the rows of the model being sorted, indexed by model row.
    sort_keys: Option<Vec<Value>>,
}

impl DefaultColumn {
    /// Creates a sortable, visible, left-aligned plain-text column.
    pub fn new(header: impl Into<String>, data_column: usize) -> Self {
        Self {
            header: header.into(),
            data_column,
            alignment: Alignment::Left,
            sortable: true,
            visible: true,
            action: None,
            renderer: CellRenderer::PlainText,
            sort_keys: None,
        }
    }

    /// Sets the alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets whether the column can be sorted.
    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets whether the column is rendered.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Makes each cell a link triggering `action` for its row.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Sets the cell renderer.
    pub fn with_renderer(mut self, renderer: CellRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// The data column this descriptor reads.
    pub fn data_column(&self) -> usize {
        self.data_column
    }

    /// Whether sort keys are currently cached.
    pub fn has_cached_sort_keys(&self) -> bool {
        self.sort_keys.is_some()
    }
}

impl<M: DataModel> ColumnDescriptor<M> for DefaultColumn {
    fn header(&self) -> &str {
        &self.header
    }

    fn alignment(&self) -> Alignment {
        self.alignment
    }

    fn is_sortable(&self) -> bool {
        self.sortable
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    fn compare(&self, model: &M, row_a: usize, row_b: usize) -> Ordering {
        if let Some(keys) = &self.sort_keys
            && let (Some(a), Some(b)) = (keys.get(row_a), keys.get(row_b))
        {
            return compare_values(a, b);
        }
        compare_values(
            &model.value_at(row_a, self.data_column),
            &model.value_at(row_b, self.data_column),
        )
    }

    fn render(&self, model: &M, row: usize) -> String {
        self.renderer
            .render(&model.value_at(row, self.data_column))
    }

    fn hover_text(&self, model: &M, row: usize) -> Option<String> {
        self.renderer
            .hover_text(&model.value_at(row, self.data_column))
    }

    fn on_model_changed(&mut self, _model: &M) {
        self.sort_keys = None;
    }

    fn on_sort_start(&mut self, model: &M) {
        let keys = (0..model.row_count())
            .map(|row| model.value_at(row, self.data_column))
            .collect();
        self.sort_keys = Some(keys);
    }

    fn on_other_column_sorted(&mut self) {
        self.sort_keys = None;
    }
}

/// A column of identical action links, such as "Edit" or "Remove".
#[derive(Debug, Clone)]
pub struct ActionColumn {
    header: String,
    label: String,
    action: String,
    alignment: Alignment,
}

impl ActionColumn {
    /// Creates an action column whose cells read `label` and trigger `action`.
    pub fn new(
        header: impl Into<String>,
        label: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            header: header.into(),
            label: label.into(),
            action: action.into(),
            alignment: Alignment::Left,
        }
    }

    /// Sets the alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl<M: DataModel> ColumnDescriptor<M> for ActionColumn {
    fn header(&self) -> &str {
        &self.header
    }

    fn alignment(&self) -> Alignment {
        self.alignment
    }

    fn is_sortable(&self) -> bool {
        false
    }

    fn action(&self) -> Option<&str> {
        Some(&self.action)
    }

    fn compare(&self, _model: &M, _row_a: usize, _row_b: usize) -> Ordering {
        Ordering::Equal
    }

    fn render(&self, _model: &M, _row: usize) -> String {
        escape_html(&self.label)
    }
}
