//! Test doubles for code that drives a [`TableSurface`].

use crate::{
    model::{BreakpointTableModel, COLUMN_COUNT, Column},
    view::{ColumnSizing, TableSurface},
};

/// A surface that records what it was asked to display.
///
/// Positions are row indices into the last rendered table.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub sizing: [Option<ColumnSizing>; COLUMN_COUNT],
    pub renders: usize,
    pub headers: Vec<String>,
    pub displayed: Vec<Vec<String>>,
}

impl TableSurface for RecordingSurface {
    type Position = usize;

    fn set_column_sizing(&mut self, column: Column, sizing: ColumnSizing) {
        self.sizing[column.index()] = Some(sizing);
    }

    fn render_table(&mut self, model: &BreakpointTableModel) {
        self.renders += 1;
        self.headers = (0..model.column_count())
            .filter_map(|column| model.header_label(column))
            .map(str::to_string)
            .collect();
        self.displayed = (0..model.row_count())
            .map(|row| {
                (0..model.column_count())
                    .filter_map(|column| model.display_value(row, column))
                    .collect()
            })
            .collect();
    }

    fn row_at(&self, position: usize) -> Option<usize> {
        (position < self.displayed.len()).then_some(position)
    }
}
