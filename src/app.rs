use std::path::PathBuf;

use crate::{
    config::ViewerConfig,
    dump::Document,
    event::{AppEvent, Event, EventHandler},
    table::{SortField, rows_for},
    ui::{
        dashboard::DashboardWidget,
        state::{Focussable, UiState},
    },
};
use color_eyre::eyre::Result;
use log::*;
use ratatui::{
    DefaultTerminal,
    buffer::Buffer,
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    layout::Rect,
    widgets::Widget,
};

pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub document: Document,
    pub config: ViewerConfig,
    pub ui_state: UiState,
}

impl App {
    pub fn new(file_path: PathBuf, config: ViewerConfig) -> Result<Self> {
        let events = EventHandler::new();
        let mut document = Document::load(file_path)?;
        if config.watch
            && let Err(e) = document.watch(events.clone_sender())
        {
            warn!(target: "App", "Not watching {:?}: {}", document.file_path, e);
        }
        let mut ui_state = UiState::new(&config);
        ui_state.document_loaded(document.summaries().len());
        Ok(Self {
            running: true,
            events,
            document,
            config,
            ui_state,
        })
    }

    /// Run the application's main loop.
    pub async fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while self.running {
            terminal.draw(|frame| self.render(frame.area(), frame.buffer_mut()))?;
            match self.events.next().await? {
                Event::Tick => self.tick(),
                Event::Crossterm(event) => match event {
                    crossterm::event::Event::Key(key_event)
                        if key_event.kind == crossterm::event::KeyEventKind::Press =>
                    {
                        self.handle_key_events(key_event)?
                    }
                    _ => {}
                },
                Event::App(app_event) => match app_event {
                    AppEvent::Reload => self.reload_document(),
                    AppEvent::Quit => self.quit(),
                },
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) -> Result<()> {
        match key_event.code {
            KeyCode::Esc | KeyCode::Char('q') => self.events.send(AppEvent::Quit),
            KeyCode::Char('c' | 'C') if key_event.modifiers == KeyModifiers::CONTROL => {
                self.events.send(AppEvent::Quit)
            }
            KeyCode::Char('r') => self.events.send(AppEvent::Reload),
            KeyCode::Char('t') => self.ui_state.toggle_theme(),
            KeyCode::Char('D') => self.ui_state.toggle_debug(),
            KeyCode::Tab => self.ui_state.focus_next(),
            KeyCode::BackTab => self.ui_state.focus_prev(),
            KeyCode::Enter => self.ui_state.toggle_zoom(),
            _ if self.ui_state.chart_focussed() => self.handle_chart_key(key_event.code),
            _ if self.ui_state.focus == Focussable::Threads => {
                self.handle_table_key(key_event.code)
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_chart_key(&mut self, code: KeyCode) {
        let len = self.document.summaries().len();
        let selection = &mut self.ui_state.selection;
        match code {
            KeyCode::Left => selection.move_by(-1, len),
            KeyCode::Right => selection.move_by(1, len),
            KeyCode::Home => selection.home(),
            KeyCode::End => selection.end(len),
            KeyCode::Char(' ') => {
                if let Some(range) = selection.toggle(self.document.summaries()) {
                    debug!(target: "App", "Selected {:?}", range);
                    self.ui_state.pager.reset();
                }
            }
            KeyCode::Char('c') => {
                selection.clear();
                self.ui_state.pager.reset();
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, code: KeyCode) {
        let rows = rows_for(self.document.summaries(), self.ui_state.selection.range()).len();
        match code {
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                self.ui_state.sort_by(SortField::ALL[index]);
            }
            KeyCode::Char('n') | KeyCode::PageDown => {
                self.ui_state.pager.next(rows);
            }
            KeyCode::Char('p') | KeyCode::PageUp => {
                self.ui_state.pager.prev(rows);
            }
            _ => {}
        }
    }

    /// Handles the tick event of the terminal.
    fn tick(&mut self) {
        self.ui_state.tick();
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }

    fn reload_document(&mut self) {
        debug!(target: "App", "Reload!");
        match self.document.reload() {
            Ok(report) => {
                let snapshots = report.summaries.len();
                self.ui_state.document_loaded(snapshots);
            }
            Err(e) => error!(target: "App", "{}", e),
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        DashboardWidget {
            ui: &self.ui_state,
            document: &self.document,
            config: &self.config,
        }
        .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SortDirection;
    use std::fs;

    fn app(name: &str) -> App {
        let path = std::env::temp_dir().join(format!("sjkview-app-{}-{}.txt", name, std::process::id()));
        fs::write(&path, include_str!("../testdata/ttop.txt")).unwrap();
        let config = ViewerConfig {
            page_size: 2,
            watch: false,
            ..ViewerConfig::default()
        };
        App::new(path, config).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_events(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    #[tokio::test]
    async fn starts_at_latest_snapshot() {
        let app = app("latest");
        assert_eq!(app.ui_state.selection.cursor, 2);
        assert!(!app.document.is_watched());
    }

    #[tokio::test]
    async fn brush_selects_range_on_chart() {
        let mut app = app("brush");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.ui_state.selection.is_selecting());
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));
        let range = app.ui_state.selection.range().copied().unwrap();
        assert_eq!(range.start, 1_710_411_302_123);
        assert!(range.contains(app.document.summaries()[1].timestamp));
        assert!(!range.contains(app.document.summaries()[2].timestamp));
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.ui_state.selection.range(), None);
    }

    #[tokio::test]
    async fn table_keys_sort_and_page() {
        let mut app = app("table");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.ui_state.focus, Focussable::Threads);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.ui_state.sort.field, SortField::Name);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.ui_state.sort.direction, SortDirection::Asc);

        // 7 rows at 2 per page
        for _ in 0..10 {
            press(&mut app, KeyCode::PageDown);
        }
        assert_eq!(app.ui_state.pager.page, 4);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.ui_state.pager.page, 3);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.ui_state.pager.page, 1);
    }

    #[tokio::test]
    async fn chart_keys_ignored_on_table() {
        let mut app = app("focus");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.ui_state.selection.cursor, 2);
    }

    #[tokio::test]
    async fn reload_resets_selection() {
        let mut app = app("reload");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char(' '));
        assert!(app.ui_state.selection.range().is_some());
        app.reload_document();
        assert_eq!(app.ui_state.selection.range(), None);
        assert_eq!(app.ui_state.selection.cursor, 2);
    }

    #[tokio::test]
    async fn renders_dashboard() {
        let mut app = app("render");
        let area = Rect::new(0, 0, 160, 50);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("3 snapshots"), "{}", text);
        assert!(text.contains("2 blocks dropped"), "{}", text);
        assert!(text.contains("CPU Usage"), "{}", text);
        assert!(text.contains("Thread Details"), "{}", text);
    }

    #[tokio::test]
    async fn debug_panel_shows_settings() {
        let mut app = app("settings");
        press(&mut app, KeyCode::Char('D'));
        let area = Rect::new(0, 0, 200, 80);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("ViewerConfig"), "{}", text);
        assert!(text.contains("page_size: 2"), "{}", text);
    }
}
