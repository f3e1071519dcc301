//! CSV export of the grid contents.
//!
//! The export holds the visible columns and every row of the active model
//! in display order. Paging does not restrict it. Cells use the same text
//! the filter matches against: hover text where a column has one, otherwise
//! the rendered markup with tags removed.

use std::fs::File;
use std::io;
use std::path::Path;

use horizon_grid_core::logging::targets;

use super::controller::GridController;
use super::filter::cell_text;
use crate::error::{GridError, Result};
use crate::model::DataModel;

impl<M: DataModel> GridController<M> {
    /// Writes the grid as CSV to `writer`, header row first.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Export`] if writing fails.
    pub fn export_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new().from_writer(writer);
        csv.write_record(self.visible_columns().map(|column| column.header()))?;

        let mut rows = 0;
        if let Some(model) = self.active_model() {
            let columns: Vec<_> = self.visible_columns().collect();
            for &active_row in self.sort_index().as_slice() {
                csv.write_record(
                    columns
                        .iter()
                        .map(|column| cell_text(*column, model, active_row)),
                )?;
                rows += 1;
            }
        }
        csv.flush().map_err(csv::Error::from)?;

        tracing::debug!(target: targets::RENDER, rows, "exported grid as CSV");
        Ok(())
    }

    /// Writes the grid as CSV to a file.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Io`] if the file cannot be created, and
    /// [`GridError::Export`] if writing fails.
    pub fn export_csv_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| GridError::io(path, source))?;
        self.export_csv(io::BufWriter::new(file))
    }

    /// The CSV export as a string.
    pub fn export_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.export_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellRenderer, DefaultColumn, TableDataModel, Value};
    use crate::table::PageAction;
    use horizon_grid_core::GridConfig;

    fn create_grid() -> GridController<TableDataModel<(&'static str, i64)>> {
        let rows = vec![("b, the second", 2), ("a <first>", 1), ("c", 3)];
        let model = TableDataModel::new(rows, 2, |row: &(&'static str, i64), column| match column {
            0 => Value::from(row.0),
            _ => Value::Int(row.1),
        });
        let mut grid = GridController::new("t", GridConfig::new().with_page_size(1))
            .with_column(DefaultColumn::new("Name", 0))
            .with_column(DefaultColumn::new("Rank", 1).with_renderer(CellRenderer::css_with_hover(
                |v| format!("o_rank_{}", v.display_text()),
                |v| format!("#{}", v.display_text()),
            )))
            .with_column(DefaultColumn::new("Hidden", 1).with_visible(false));
        grid.set_model(model).unwrap();
        grid
    }

    #[test]
    fn test_export_in_display_order_ignoring_paging() {
        let mut grid = create_grid();
        grid.sort(1).unwrap();
        grid.page_action(PageAction::Goto(2));

        let csv = grid.export_csv_string().unwrap();
        assert_eq!(csv, "Name,Rank\na <first>,#1\n\"b, the second\",#2\nc,#3\n");
    }

    #[test]
    fn test_export_filtered() {
        let mut grid = create_grid();
        grid.set_filter(Some("#3"));
        let csv = grid.export_csv_string().unwrap();
        assert_eq!(csv, "Name,Rank\nc,#3\n");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        create_grid().export_csv_file(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Name,Rank\n"));

        let missing = dir.path().join("missing").join("grid.csv");
        assert!(matches!(
            create_grid().export_csv_file(&missing),
            Err(GridError::Io { .. })
        ));
    }
}
