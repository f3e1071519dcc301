//! HTML rendering.
//!
//! [`GridRenderer`] is a pure function of the controller state: it reads the
//! columns, the active model and the view state, and writes the markup for
//! one grid including the encoded commands of the next request.
//!
//! Channel-A affordances (sort, move, page) become plain links when the grid
//! has no form. In multi-select mode the whole grid sits in a POST form and
//! those affordances become submit buttons with a `formaction`, so the
//! checkbox states are submitted together with the command. Row actions are
//! always plain links.

use std::fmt::Write;

use horizon_grid_core::logging::{span_names, targets};

use super::command::{PageAction, tokens};
use super::controller::{GridController, SortOrder};
use super::page::page_links;
use crate::error::{GridError, Result};
use crate::markup::escape_html;
use crate::model::{ColumnDescriptor, DataModel};

/// Renders a [`GridController`] to HTML.
#[derive(Debug)]
pub struct GridRenderer<'a, M: DataModel> {
    grid: &'a GridController<M>,
    base_url: &'a str,
}

impl<'a, M: DataModel> GridRenderer<'a, M> {
    /// Creates a renderer. Every generated link and form targets `base_url`.
    pub fn new(grid: &'a GridController<M>, base_url: &'a str) -> Self {
        Self { grid, base_url }
    }

    /// Renders the grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NoBatchActions`] if multi-select is enabled
    /// without any registered batch action.
    pub fn render(&self) -> Result<String> {
        let config = self.grid.config();
        if config.multi_select && self.grid.batch_actions().is_empty() {
            return Err(GridError::NoBatchActions);
        }

        let _span = tracing::debug_span!(
            target: targets::RENDER,
            span_names::RENDER,
            grid = self.grid.id()
        )
        .entered();

        let names = self.grid.param_names();
        let mut out = String::new();
        let class = match &config.css_class {
            Some(extra) => format!("o_table_wrapper {}", escape_html(extra)),
            None => "o_table_wrapper".to_string(),
        };
        write!(
            out,
            "<div class=\"{class}\" id=\"o_table_{}\">",
            escape_html(names.id())
        )
        .expect("write to String");

        if config.multi_select {
            write!(
                out,
                "<form method=\"post\" action=\"{}\"><input type=\"hidden\" name=\"{}\" value=\"1\">",
                escape_html(self.base_url),
                escape_html(&names.form_marker())
            )
            .expect("write to String");
        }

        if config.display_row_count {
            let rows = self.grid.row_count();
            let noun = if rows == 1 { "entry" } else { "entries" };
            write!(out, "<div class=\"o_table_rowcount\">{rows} {noun}</div>")
                .expect("write to String");
        }

        out.push_str("<table class=\"o_table\">");
        if config.display_header {
            self.render_header(&mut out);
        }
        self.render_body(&mut out);
        out.push_str("</table>");

        self.render_pagination(&mut out);

        if config.multi_select {
            out.push_str("<div class=\"o_table_batch_buttons\">");
            for action in self.grid.batch_actions() {
                write!(
                    out,
                    "<button type=\"submit\" name=\"{}\" value=\"{label}\">{label}</button>",
                    escape_html(&names.batch_action(action.id())),
                    label = escape_html(action.label())
                )
                .expect("write to String");
            }
            out.push_str("</div></form>");
        }
        out.push_str("</div>");

        tracing::debug!(target: targets::RENDER, bytes = out.len(), "rendered grid");
        Ok(out)
    }

    fn render_header(&self, out: &mut String) {
        let config = self.grid.config();
        let sort_column = self.grid.sort_column();
        let sort_order = self.grid.sort_order().unwrap_or_default();
        let movable = config.column_moving_enabled && config.column_reordering_enabled;

        out.push_str("<thead><tr>");
        if config.multi_select {
            out.push_str("<th class=\"o_col_select\"></th>");
        }
        for (index, column) in self.grid.visible_columns().enumerate() {
            let mut class = column.alignment().css_class().to_string();
            let mut aria = String::new();
            if sort_column == Some(index) {
                let (suffix, aria_value) = match sort_order {
                    SortOrder::Ascending => ("asc", "ascending"),
                    SortOrder::Descending => ("desc", "descending"),
                };
                write!(class, " o_sorted_{suffix}").expect("write to String");
                aria = format!(" aria-sort=\"{aria_value}\"");
            }
            write!(out, "<th class=\"{class}\"{aria}>").expect("write to String");

            let header = escape_html(column.header());
            if config.sorting_enabled && column.is_sortable() {
                out.push_str(&self.command_control(
                    tokens::SORT,
                    &index.to_string(),
                    &header,
                    "o_sort",
                ));
            } else {
                out.push_str(&header);
            }
            if movable {
                out.push_str(&self.command_control(
                    tokens::MOVE_LEFT,
                    &index.to_string(),
                    "&lsaquo;",
                    "o_move_left",
                ));
                out.push_str(&self.command_control(
                    tokens::MOVE_RIGHT,
                    &index.to_string(),
                    "&rsaquo;",
                    "o_move_right",
                ));
            }
            out.push_str("</th>");
        }
        out.push_str("</tr></thead>");
    }

    fn render_body(&self, out: &mut String) {
        let config = self.grid.config();
        out.push_str("<tbody>");

        let Some(model) = self.grid.active_model().filter(|m| m.row_count() > 0) else {
            let colspan = self.grid.visible_column_count() + usize::from(config.multi_select);
            write!(
                out,
                "<tr class=\"o_table_empty\"><td colspan=\"{}\">{}</td></tr></tbody>",
                colspan.max(1),
                escape_html(&config.empty_message)
            )
            .expect("write to String");
            return;
        };

        let names = self.grid.param_names();
        let selection = self.grid.selection();
        let columns: Vec<&dyn ColumnDescriptor<M>> = self.grid.visible_columns().collect();
        let visible_rows = self.grid.visible_rows();
        tracing::trace!(target: targets::RENDER, rows = visible_rows.len(), "rendering body");

        for active_row in visible_rows {
            let row = self.grid.source_row(active_row);
            if self.grid.highlighted_row() == Some(row) {
                out.push_str("<tr class=\"o_row_highlighted\">");
            } else {
                out.push_str("<tr>");
            }

            if config.multi_select {
                let mut flags = String::new();
                if selection.is_selected(row) || selection.is_readonly(row) {
                    flags.push_str(" checked");
                }
                if selection.is_readonly(row) {
                    flags.push_str(" disabled");
                }
                write!(
                    out,
                    "<td class=\"o_col_select\"><input type=\"checkbox\" name=\"{}\" value=\"{row}\"{flags}></td>",
                    escape_html(&names.multi_select())
                )
                .expect("write to String");
            }

            for column in &columns {
                let cell = column.render(model, active_row);
                write!(out, "<td class=\"{}\">", column.alignment().css_class())
                    .expect("write to String");
                match column.action() {
                    Some(action) => write!(
                        out,
                        "<a href=\"{}\">{cell}</a>",
                        self.href(&names.row_action_query(row, action))
                    )
                    .expect("write to String"),
                    None => out.push_str(&cell),
                }
                out.push_str("</td>");
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody>");
    }

    fn render_pagination(&self, out: &mut String) {
        let config = self.grid.config();
        if !config.paging_enabled {
            return;
        }
        let page_state = self.grid.page_state();
        let row_count = self.grid.row_count();
        let max_page = self.grid.max_page();

        let Some(current) = page_state.current_page() else {
            if row_count > page_state.page_size() {
                out.push_str("<div class=\"o_table_pagination\">");
                out.push_str(&self.command_control(
                    tokens::PAGE,
                    &PageAction::ShowPages.argument(),
                    "Show pages",
                    "o_page_show_pages",
                ));
                out.push_str("</div>");
            }
            return;
        };
        if max_page < 2 {
            return;
        }
        let current = current.clamp(1, max_page);

        out.push_str("<div class=\"o_table_pagination\">");
        if current > 1 {
            out.push_str(&self.command_control(
                tokens::PAGE,
                &PageAction::Back.argument(),
                "&laquo;",
                "o_page_back",
            ));
        }

        let mut previous = 0;
        for page in page_links(current, max_page) {
            if page > previous + 1 {
                out.push_str("<span class=\"o_page_gap\">&hellip;</span>");
            }
            if page == current {
                write!(out, "<span class=\"o_page_current\">{page}</span>")
                    .expect("write to String");
            } else {
                out.push_str(&self.command_control(
                    tokens::PAGE,
                    &page.to_string(),
                    &page.to_string(),
                    "o_page",
                ));
            }
            previous = page;
        }

        if current < max_page {
            out.push_str(&self.command_control(
                tokens::PAGE,
                &PageAction::Forward.argument(),
                "&raquo;",
                "o_page_forward",
            ));
        }
        if config.show_all_link_enabled {
            out.push_str(&self.command_control(
                tokens::PAGE,
                &PageAction::ShowAll.argument(),
                "Show all",
                "o_page_show_all",
            ));
        }
        out.push_str("</div>");
    }

    /// A Channel-A affordance. `label` must already be escaped.
    fn command_control(&self, token: &str, argument: &str, label: &str, class: &str) -> String {
        let target = self.href(&self.grid.param_names().command_query(token, argument));
        if self.grid.config().multi_select {
            format!("<button type=\"submit\" class=\"{class}\" formaction=\"{target}\">{label}</button>")
        } else {
            format!("<a class=\"{class}\" href=\"{target}\">{label}</a>")
        }
    }

    /// `base_url` with `query` appended, escaped for an attribute value.
    fn href(&self, query: &str) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        escape_html(&format!("{}{separator}{query}", self.base_url))
    }
}

impl<M: DataModel> GridController<M> {
    /// Renders the grid to HTML with links targeting `base_url`.
    ///
    /// # Errors
    ///
    /// See [`GridRenderer::render`].
    pub fn render(&self, base_url: &str) -> Result<String> {
        GridRenderer::new(self, base_url).render()
    }
}
