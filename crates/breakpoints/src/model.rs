//! Table model over a breakpoint store.
//!
//! The store is flattened into one [`Row`] per breakpoint. The rows are an
//! immutable snapshot: [`BreakpointTableModel::set_data`] and sorting replace
//! the snapshot wholesale rather than editing it in place.

use std::{
    borrow::Cow,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{i18n::Locale, store::BreakpointStore};

/// Number of columns in the table.
pub const COLUMN_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    File,
    Line,
    Condition,
    /// Unused trailing column that takes up the remaining width.
    Reserved,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] =
        [Column::File, Column::Line, Column::Condition, Column::Reserved];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Column::File => "File",
            Column::Line => "Line",
            Column::Condition => "Condition",
            Column::Reserved => "",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// A single breakpoint as shown in the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    pub path: PathBuf,
    pub line: usize,
    pub condition: String,
    pub reserved: String,
}

impl Row {
    /// The final component of the path, as shown in the File column.
    pub fn file_name(&self) -> Cow<'_, str> {
        base_name(&self.path)
    }
}

fn base_name(path: &Path) -> Cow<'_, str> {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default()
}

/// The raw value stored in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue<'a> {
    Path(&'a Path),
    Line(usize),
    Text(&'a str),
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Path(path) => write!(f, "{}", path.display()),
            CellValue::Line(line) => write!(f, "{line}"),
            CellValue::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BreakpointTableModel {
    rows: Arc<[Row]>,
    locale: Locale,
}

impl Default for BreakpointTableModel {
    fn default() -> Self {
        Self {
            rows: Arc::from(Vec::new()),
            locale: Locale::default(),
        }
    }
}

impl BreakpointTableModel {
    pub fn new(store: &BreakpointStore) -> Self {
        let mut model = Self::default();
        model.set_data(store);
        model
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Replace the rows with the flattened contents of `store`.
    pub fn set_data(&mut self, store: &BreakpointStore) {
        let rows: Vec<Row> = store
            .iter()
            .flat_map(|(path, entries)| {
                entries.iter().map(move |entry| Row {
                    path: path.clone(),
                    line: entry.line,
                    condition: entry.condition.clone(),
                    reserved: String::new(),
                })
            })
            .collect();
        tracing::debug!(rows = rows.len(), "rebuilt breakpoint rows");
        self.rows = rows.into();
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    /// The raw value at (`row`, `column`), or `None` when out of range.
    pub fn cell_value(&self, row: usize, column: usize) -> Option<CellValue<'_>> {
        let row = self.rows.get(row)?;
        let value = match Column::from_index(column)? {
            Column::File => CellValue::Path(&row.path),
            Column::Line => CellValue::Line(row.line),
            Column::Condition => CellValue::Text(&row.condition),
            Column::Reserved => CellValue::Text(&row.reserved),
        };
        Some(value)
    }

    /// The text shown in a cell. The File column only shows the base name.
    pub fn display_value(&self, row: usize, column: usize) -> Option<String> {
        match self.cell_value(row, column)? {
            CellValue::Path(path) => Some(base_name(path).into_owned()),
            other => Some(other.to_string()),
        }
    }

    /// The full path for cells in the File column; no other column has a tooltip.
    pub fn tooltip(&self, row: usize, column: usize) -> Option<String> {
        match self.cell_value(row, column)? {
            CellValue::Path(path) => Some(path.display().to_string()),
            _ => None,
        }
    }

    pub fn header_label(&self, column: usize) -> Option<&'static str> {
        Column::from_index(column).map(|column| self.locale.translate(column.label()))
    }

    /// Sort the rows by `column`.
    ///
    /// Only the File column sorts: rows are ordered by line number, then
    /// stably re-ordered by file base name, which groups rows by file with
    /// lines ascending inside each group. `order` does not change the result.
    /// Sorting by any other column leaves the rows untouched.
    pub fn sort_by_column(&mut self, column: usize, order: SortOrder) {
        if Column::from_index(column) != Some(Column::File) {
            tracing::trace!(column, ?order, "column does not define an ordering");
            return;
        }

        let mut rows = self.rows.to_vec();
        rows.sort_by_key(|row| row.line);
        rows.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        self.rows = rows.into();
    }
}
