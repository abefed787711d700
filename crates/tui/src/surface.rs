use breakpoints::{BreakpointTableModel, COLUMN_COUNT, Column, ColumnSizing, TableSurface};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Paragraph, Row, Table, TableState},
};

/// Draws the breakpoint table into a terminal frame.
///
/// The model is copied into display strings on every
/// [`TableSurface::render_table`]; drawing happens later, once per frame.
#[derive(Default)]
pub struct TerminalSurface {
    sizing: [Option<ColumnSizing>; COLUMN_COUNT],
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    tooltips: Vec<Option<String>>,
    state: TableState,
    // where the table body was last drawn, for mapping mouse positions
    body: Option<Rect>,
}

impl TerminalSurface {
    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn select(&mut self, row: usize) {
        if row < self.rows.len() {
            self.state.select(Some(row));
        }
    }

    pub fn select_next(&mut self) {
        let next = match self.state.selected() {
            Some(row) => (row + 1).min(self.rows.len().saturating_sub(1)),
            None => 0,
        };
        self.select(next);
    }

    pub fn select_previous(&mut self) {
        let previous = self.state.selected().map_or(0, |row| row.saturating_sub(1));
        self.select(previous);
    }

    fn widths(&self) -> Vec<Constraint> {
        (0..COLUMN_COUNT)
            .map(|column| match self.sizing[column] {
                Some(ColumnSizing::ResizeToContents) => {
                    let widest = self
                        .rows
                        .iter()
                        .filter_map(|row| row.get(column))
                        .chain(self.headers.get(column))
                        .map(|text| Line::raw(text.as_str()).width())
                        .max()
                        .unwrap_or(0);
                    Constraint::Length(u16::try_from(widest).unwrap_or(u16::MAX))
                }
                Some(ColumnSizing::Stretch) => Constraint::Fill(1),
                None => Constraint::Min(0),
            })
            .collect()
    }

    /// Draw the table with a status line underneath showing the full path of
    /// the selected breakpoint.
    pub fn draw(&mut self, frame: &mut Frame, area: Rect, title: &str) {
        let [table_area, status_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let header = Row::new(self.headers.iter().map(String::as_str)).bold();
        let rows = self
            .rows
            .iter()
            .map(|cells| Row::new(cells.iter().map(String::as_str)));
        let block = Block::bordered().title(title);
        let inner = block.inner(table_area);
        let table = Table::new(rows, self.widths())
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        frame.render_stateful_widget(table, table_area, &mut self.state);

        // the header takes the first line inside the border
        self.body = (inner.height > 1).then(|| Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        });

        let tooltip = self
            .state
            .selected()
            .and_then(|row| self.tooltips.get(row).cloned().flatten())
            .unwrap_or_default();
        frame.render_widget(Paragraph::new(tooltip).dim(), status_area);
    }
}

impl TableSurface for TerminalSurface {
    /// Terminal cell as `(column, row)`.
    type Position = (u16, u16);

    fn set_column_sizing(&mut self, column: Column, sizing: ColumnSizing) {
        self.sizing[column.index()] = Some(sizing);
    }

    fn render_table(&mut self, model: &BreakpointTableModel) {
        self.headers = (0..model.column_count())
            .filter_map(|column| model.header_label(column))
            .map(str::to_string)
            .collect();
        self.rows = (0..model.row_count())
            .map(|row| {
                (0..model.column_count())
                    .filter_map(|column| model.display_value(row, column))
                    .collect()
            })
            .collect();
        self.tooltips = (0..model.row_count())
            .map(|row| model.tooltip(row, Column::File.index()))
            .collect();

        let selected = match self.state.selected() {
            _ if self.rows.is_empty() => None,
            Some(row) => Some(row.min(self.rows.len() - 1)),
            None => Some(0),
        };
        self.state.select(selected);
    }

    fn row_at(&self, (column, row): (u16, u16)) -> Option<usize> {
        let body = self.body?;
        if column < body.x || column >= body.right() || row < body.y || row >= body.bottom() {
            return None;
        }
        let index = self.state.offset() + usize::from(row - body.y);
        (index < self.rows.len()).then_some(index)
    }
}
