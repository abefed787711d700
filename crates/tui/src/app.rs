use std::time::{Duration, Instant};

use breakpoints::{BreakpointWidget, NavigationRequest, TableSurface};
use config::FileConfig;
use crossbeam_channel::{Receiver, Sender};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use eyre::Context;
use ratatui::{DefaultTerminal, Frame};

use crate::surface::TerminalSurface;

/// Two presses on the same row within this interval count as a double click.
const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(500);

/// Pass terminal events on to `tx` until reading fails or nobody listens.
fn forward_events(mut read: impl FnMut() -> std::io::Result<Event>, tx: Sender<Event>) {
    loop {
        match read() {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "event stream failed, stopping input");
                break;
            }
        }
    }
}

pub(crate) struct App {
    widget: BreakpointWidget<FileConfig, TerminalSurface>,
    requests: Receiver<NavigationRequest>,
    last_click: Option<(Instant, usize)>,
    should_terminate: bool,
    chosen: Option<NavigationRequest>,
}

impl App {
    pub(crate) fn new(widget: BreakpointWidget<FileConfig, TerminalSurface>) -> Self {
        let requests = widget.navigation_requests();
        Self {
            widget,
            requests,
            last_click: None,
            should_terminate: false,
            chosen: None,
        }
    }

    /// Run until the user quits or activates a breakpoint, returning the
    /// navigation request if one was made.
    pub(crate) fn run(
        mut self,
        mut terminal: DefaultTerminal,
    ) -> eyre::Result<Option<NavigationRequest>> {
        // set up background thread polling for terminal events
        let (tx, rx) = crossbeam_channel::unbounded();
        std::thread::spawn(move || forward_events(crossterm::event::read, tx));

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if self.should_terminate {
                tracing::info!("terminating application");
                return Ok(self.chosen);
            }

            crossbeam_channel::select! {
                recv(self.requests) -> msg => match msg {
                    Ok(request) => self.handle_navigation(request),
                    Err(e) => tracing::debug!(error = %e, "navigation channel closed"),
                },
                recv(rx) -> msg => {
                    let event = msg.context("reading terminal event")?;
                    self.handle_event(event);
                },
            }
        }
    }

    #[tracing::instrument(skip(self))]
    fn handle_navigation(&mut self, request: NavigationRequest) {
        tracing::debug!("breakpoint activated");
        self.chosen = Some(request);
        self.should_terminate = true;
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_terminate = true,
            KeyCode::Char('j') | KeyCode::Down => {
                self.widget.view_mut().surface_mut().select_next()
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.widget.view_mut().surface_mut().select_previous()
            }
            KeyCode::Enter => {
                if let Some(row) = self.widget.view().surface().selected() {
                    self.widget.view_mut().activate_row(row);
                }
            }
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let position = (mouse.column, mouse.row);
        let Some(row) = self.widget.view().surface().row_at(position) else {
            self.last_click = None;
            return;
        };

        let now = Instant::now();
        match self.last_click.take() {
            Some((at, previous))
                if previous == row && now.duration_since(at) <= DOUBLE_CLICK_INTERVAL =>
            {
                self.widget.view_mut().on_double_click(position);
            }
            _ => {
                self.widget.view_mut().surface_mut().select(row);
                self.last_click = Some((now, row));
            }
        }
    }

    fn refresh(&mut self) {
        if let Err(e) = self
            .widget
            .config_mut()
            .reload()
            .wrap_err("reloading breakpoints")
        {
            tracing::warn!(error = %e, "keeping previously loaded configuration");
        }
        self.widget.refresh();
    }

    fn draw(&mut self, frame: &mut Frame) {
        let title = self.widget.title();
        let area = frame.area();
        self.widget.view_mut().surface_mut().draw(frame, area, title);
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        config_path: PathBuf,
        first: PathBuf,
        second: PathBuf,
    }

    fn write_config(config_path: &Path, files: &[(&Path, usize)]) {
        let mut contents = String::from("[run.breakpoints]\n");
        for (path, line) in files {
            contents.push_str(&format!("\"{}\" = [[{line}, \"\"]]\n", path.display()));
        }
        std::fs::write(config_path, contents).unwrap();
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.py");
        let second = dir.path().join("second.py");
        std::fs::write(&first, "").unwrap();
        std::fs::write(&second, "").unwrap();
        let config_path = dir.path().join("config.toml");
        write_config(&config_path, &[(&first, 3), (&second, 9)]);
        Fixture {
            _dir: dir,
            config_path,
            first,
            second,
        }
    }

    /// Build the app and draw it once so screen positions map to rows.
    fn app(fixture: &Fixture) -> App {
        let config = FileConfig::load(&fixture.config_path).unwrap();
        let mut app = App::new(BreakpointWidget::new(config, TerminalSurface::default()));
        let mut terminal = Terminal::new(TestBackend::new(50, 8)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        app
    }

    // the table border and header take the first two screen lines
    fn press(app: &mut App, row: u16) {
        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    fn key(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn event_forwarding_stops_after_read_error() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut reads = 0;
        forward_events(
            || {
                reads += 1;
                match reads {
                    1 => Ok(Event::FocusGained),
                    2 => Err(std::io::Error::other("terminal gone")),
                    _ => panic!("read after failure"),
                }
            },
            tx,
        );

        assert_eq!(reads, 2);
        assert_eq!(rx.try_recv().unwrap(), Event::FocusGained);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn event_forwarding_stops_without_listener() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let mut reads = 0;
        forward_events(
            || {
                reads += 1;
                Ok(Event::FocusLost)
            },
            tx,
        );

        assert_eq!(reads, 1);
    }

    #[test]
    fn double_press_activates_row() {
        let fixture = fixture();
        let mut app = app(&fixture);

        press(&mut app, 3);
        assert!(app.requests.try_recv().is_err());
        press(&mut app, 3);

        let request = app.requests.try_recv().unwrap();
        assert_eq!(request.path, fixture.second);
        assert_eq!(request.line, 9);
        assert!(app.requests.try_recv().is_err());
    }

    #[test]
    fn presses_on_different_rows_do_not_activate() {
        let fixture = fixture();
        let mut app = app(&fixture);

        press(&mut app, 2);
        press(&mut app, 3);
        assert!(app.requests.try_recv().is_err());
        assert_eq!(app.widget.view().surface().selected(), Some(1));
    }

    #[test]
    fn press_outside_rows_resets_pending_click() {
        let fixture = fixture();
        let mut app = app(&fixture);

        press(&mut app, 2);
        press(&mut app, 6);
        press(&mut app, 2);
        assert!(app.requests.try_recv().is_err());
    }

    #[test]
    fn slow_presses_do_not_activate() {
        let fixture = fixture();
        let mut app = app(&fixture);

        press(&mut app, 2);
        let earlier = Instant::now()
            .checked_sub(DOUBLE_CLICK_INTERVAL * 2)
            .unwrap();
        app.last_click = Some((earlier, 0));
        press(&mut app, 2);
        assert!(app.requests.try_recv().is_err());
    }

    #[test]
    fn enter_activates_selected_row() {
        let fixture = fixture();
        let mut app = app(&fixture);

        key(&mut app, KeyCode::Char('j'));
        key(&mut app, KeyCode::Enter);

        let request = app.requests.try_recv().unwrap();
        assert_eq!(request.path, fixture.second);
        assert!(app.requests.try_recv().is_err());

        key(&mut app, KeyCode::Up);
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.requests.try_recv().unwrap().path, fixture.first);
    }

    #[test]
    fn refresh_rereads_configuration() {
        let fixture = fixture();
        let mut app = app(&fixture);
        assert_eq!(app.widget.view().model().row_count(), 2);

        write_config(&fixture.config_path, &[(&fixture.first, 3)]);
        key(&mut app, KeyCode::Char('r'));

        assert_eq!(app.widget.view().model().row_count(), 1);
        assert_eq!(app.widget.view().surface().selected(), Some(0));
    }

    #[test]
    fn quit_and_navigation_terminate() {
        let fixture = fixture();
        let mut app = app(&fixture);
        key(&mut app, KeyCode::Char('q'));
        assert!(app.should_terminate);

        let mut app = self::app(&fixture);
        key(&mut app, KeyCode::Enter);
        let request = app.requests.try_recv().unwrap();
        app.handle_navigation(request.clone());
        assert!(app.should_terminate);
        assert_eq!(app.chosen, Some(request));
    }
}
