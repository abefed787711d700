//! A sortable list of persisted debugger breakpoints.
//!
//! Breakpoints are read from a [`config::ConfigProvider`], flattened into a
//! [`BreakpointTableModel`] and displayed through whatever [`TableSurface`] the
//! host UI provides. Activating a row raises a [`NavigationRequest`] for the
//! host editor.

pub mod i18n;
pub mod model;
pub mod store;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod view;
mod widget;

pub use i18n::Locale;
pub use model::{BreakpointTableModel, COLUMN_COUNT, CellValue, Column, Row, SortOrder};
pub use store::{BreakpointEntry, BreakpointStore};
pub use view::{BreakpointTableView, ColumnSizing, NavigationRequest, TableSurface};
pub use widget::{BreakpointWidget, VERSION};
