//! Presentation of the breakpoint table.
//!
//! [`BreakpointTableView`] holds the presentation policy (column sizing, the
//! initial sort, turning an activated row into a [`NavigationRequest`]) and
//! hands the actual drawing to a [`TableSurface`] supplied by the UI toolkit.

use std::path::PathBuf;

use crossbeam_channel::Sender;

use crate::{
    model::{BreakpointTableModel, Column, SortOrder},
    store::BreakpointStore,
};

/// How a column takes up horizontal space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSizing {
    /// As wide as the widest cell or header in the column.
    ResizeToContents,
    /// Whatever width remains after the other columns.
    Stretch,
}

/// Request for the host editor to open `path` at `line`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub path: PathBuf,
    pub line: usize,
    /// Always empty; carried for hosts that expect a third argument.
    pub reserved: String,
}

/// The capabilities a UI toolkit provides to display the table.
pub trait TableSurface {
    /// Whatever the toolkit reports a pointer position as.
    type Position;

    fn set_column_sizing(&mut self, column: Column, sizing: ColumnSizing);

    /// Draw the current contents of `model`, replacing anything drawn before.
    fn render_table(&mut self, model: &BreakpointTableModel);

    /// The row under `position`, if any.
    fn row_at(&self, position: Self::Position) -> Option<usize>;
}

pub struct BreakpointTableView<S> {
    model: BreakpointTableModel,
    surface: S,
    sorting_enabled: bool,
    navigation: Sender<NavigationRequest>,
}

impl<S> BreakpointTableView<S>
where
    S: TableSurface,
{
    pub fn new(
        model: BreakpointTableModel,
        surface: S,
        navigation: Sender<NavigationRequest>,
    ) -> Self {
        let mut view = Self {
            model,
            surface,
            sorting_enabled: true,
            navigation,
        };
        view.setup_table();
        view
    }

    pub fn from_store(
        store: &BreakpointStore,
        surface: S,
        navigation: Sender<NavigationRequest>,
    ) -> Self {
        Self::new(BreakpointTableModel::new(store), surface, navigation)
    }

    /// Stretch the last column, size the rest to their contents and apply the
    /// initial sort. Clicking headers does not re-sort afterwards.
    pub fn setup_table(&mut self) {
        self.surface.set_column_sizing(Column::Reserved, ColumnSizing::Stretch);
        self.adjust_columns();
        self.sorting_enabled = false;
        self.sort_by_column(Column::File.index(), SortOrder::Descending);
    }

    /// Size the first three columns to their contents.
    pub fn adjust_columns(&mut self) {
        for column in [Column::File, Column::Line, Column::Condition] {
            self.surface.set_column_sizing(column, ColumnSizing::ResizeToContents);
        }
    }

    /// Replace the table contents with `store` and repaint.
    pub fn set_data(&mut self, store: &BreakpointStore) {
        self.model.set_data(store);
        self.render();
    }

    pub fn sort_by_column(&mut self, column: usize, order: SortOrder) {
        self.model.sort_by_column(column, order);
        self.render();
    }

    /// Handle a click on a column header. Only sorts while interactive
    /// sorting is enabled, which it never is once the table is set up.
    pub fn header_clicked(&mut self, column: usize) {
        if self.sorting_enabled {
            self.sort_by_column(column, SortOrder::Ascending);
        } else {
            tracing::trace!(column, "interactive sorting disabled");
        }
    }

    pub fn sorting_enabled(&self) -> bool {
        self.sorting_enabled
    }

    pub fn render(&mut self) {
        self.surface.render_table(&self.model);
    }

    /// Resolve the row under `position` and request navigation to it.
    pub fn on_double_click(&mut self, position: S::Position) {
        match self.surface.row_at(position) {
            Some(row) => self.activate_row(row),
            None => tracing::trace!("double click outside of any row"),
        }
    }

    /// Request navigation to the breakpoint in `row`.
    #[tracing::instrument(skip(self))]
    pub fn activate_row(&mut self, row: usize) {
        let Some(row) = self.model.row(row) else {
            tracing::debug!("activated row is out of range");
            return;
        };

        let request = NavigationRequest {
            path: row.path.clone(),
            line: row.line,
            reserved: String::new(),
        };
        tracing::debug!(path = %request.path.display(), line = request.line, "requesting navigation");
        if let Err(e) = self.navigation.send(request) {
            tracing::debug!(error = %e, "no one is listening for navigation requests");
        }
    }

    pub fn model(&self) -> &BreakpointTableModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut BreakpointTableModel {
        &mut self.model
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
