use crossbeam_channel::Receiver;

use config::ConfigProvider;

use crate::{
    i18n::Locale,
    model::{BreakpointTableModel, Column, SortOrder},
    store,
    view::{BreakpointTableView, NavigationRequest, TableSurface},
};

pub const VERSION: &str = "1.0.0";

/// The breakpoint list: loads breakpoints from the configuration and shows
/// them in a [`BreakpointTableView`].
///
/// The list is a snapshot taken at construction. Call
/// [`BreakpointWidget::refresh`] to pick up breakpoints changed elsewhere.
pub struct BreakpointWidget<C, S> {
    config: C,
    view: BreakpointTableView<S>,
    navigation: Receiver<NavigationRequest>,
}

impl<C, S> BreakpointWidget<C, S>
where
    C: ConfigProvider,
    S: TableSurface,
{
    pub fn new(config: C, surface: S) -> Self {
        Self::with_locale(config, surface, Locale::default())
    }

    pub fn with_locale(config: C, surface: S, locale: Locale) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let breakpoints = store::load_breakpoints(&config);
        let model = BreakpointTableModel::new(&breakpoints).with_locale(locale);
        let view = BreakpointTableView::new(model, surface, tx);
        Self {
            config,
            view,
            navigation: rx,
        }
    }

    pub fn title(&self) -> &'static str {
        self.view.model().locale().translate("Breakpoints")
    }

    /// Reload breakpoints from the configuration and redisplay them.
    #[tracing::instrument(skip(self))]
    pub fn refresh(&mut self) {
        let breakpoints = store::load_breakpoints(&self.config);
        self.view.set_data(&breakpoints);
        self.view.adjust_columns();
        self.view.sort_by_column(Column::File.index(), SortOrder::Descending);
    }

    /// Navigation requests raised by activating rows.
    pub fn navigation_requests(&self) -> Receiver<NavigationRequest> {
        self.navigation.clone()
    }

    pub fn view(&self) -> &BreakpointTableView<S> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut BreakpointTableView<S> {
        &mut self.view
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }
}
