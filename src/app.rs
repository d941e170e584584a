use crate::catalog::{self, AvailableColumns, ColumnDef};
use crate::input::Action;
use crate::model::PropertyRecord;
use crate::viewport::{
    LayoutConfig, Navigation, TerminalSize, ViewportMetrics, ViewportState, ViewportWindow,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Screen {
    Menu,
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    None,
    LoadTable(String),
    RefreshTables,
}

#[derive(Debug, Clone)]
pub struct TableSession {
    name: String,
    records: Vec<PropertyRecord>,
    columns: AvailableColumns<'static>,
    viewport: ViewportState,
}

impl TableSession {
    pub fn new(name: impl Into<String>, records: Vec<PropertyRecord>) -> Self {
        let columns = catalog::compute_available_columns(catalog::catalog(), &records);
        Self {
            name: name.into(),
            records,
            columns,
            viewport: ViewportState::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[&'static ColumnDef] {
        &self.columns
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn metrics(
        &self,
        layout: &LayoutConfig,
        size: TerminalSize,
        row_limit: Option<usize>,
    ) -> ViewportMetrics {
        let metrics = ViewportMetrics::new(layout, size, self.records.len(), self.columns.len());
        match row_limit {
            Some(limit) => metrics.limit_rows(limit),
            None => metrics,
        }
    }

    pub fn window(
        &mut self,
        layout: &LayoutConfig,
        size: TerminalSize,
        row_limit: Option<usize>,
    ) -> ViewportWindow {
        let metrics = self.metrics(layout, size, row_limit);
        self.viewport.window(&metrics)
    }

    fn navigate(&mut self, navigation: Navigation, metrics: &ViewportMetrics) {
        self.viewport.apply(navigation, metrics);
    }
}

pub struct App {
    running: bool,
    screen: Screen,
    layout: LayoutConfig,
    terminal_size: TerminalSize,
    row_limit: Option<usize>,
    tables: Vec<String>,
    tables_error: Option<String>,
    input: String,
    menu_error: Option<String>,
    session: Option<TableSession>,
}

impl App {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            running: true,
            screen: Screen::Menu,
            terminal_size: TerminalSize::fallback(&layout),
            layout,
            row_limit: None,
            tables: Vec::new(),
            tables_error: None,
            input: String::new(),
            menu_error: None,
            session: None,
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn tables_error(&self) -> Option<&str> {
        self.tables_error.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn menu_error(&self) -> Option<&str> {
        self.menu_error.as_deref()
    }

    pub fn session(&self) -> Option<&TableSession> {
        self.session.as_ref()
    }

    pub fn set_tables(&mut self, tables: Vec<String>) {
        self.tables = tables;
        self.tables_error = None;
    }

    pub fn set_tables_error(&mut self, error: impl Into<String>) {
        self.tables.clear();
        self.tables_error = Some(error.into());
    }

    pub fn set_terminal_size(&mut self, width: u16, height: u16) {
        self.terminal_size = TerminalSize {
            width: width.clamp(1, self.layout.max_width.max(1)),
            height: height.max(1),
        };
    }

    pub fn set_row_limit(&mut self, rows: u16) {
        self.row_limit = Some(rows.max(1) as usize);
    }

    pub fn visible_window(&mut self) -> Option<ViewportWindow> {
        let layout = self.layout;
        let size = self.terminal_size;
        let row_limit = self.row_limit;
        self.session
            .as_mut()
            .map(|session| session.window(&layout, size, row_limit))
    }

    pub fn open_table(&mut self, name: impl Into<String>, records: Vec<PropertyRecord>) {
        let session = TableSession::new(name, records);
        info!(
            "opened table {} with {} sections and {} of {} columns",
            session.name(),
            session.records().len(),
            session.columns().len(),
            catalog::catalog().len()
        );
        self.session = Some(session);
        self.screen = Screen::Table;
        self.input.clear();
        self.menu_error = None;
    }

    pub fn reject_selection(&mut self, name: &str) {
        self.menu_error = Some(format!("Table '{name}' not found. Please try again..."));
    }

    pub fn set_load_error(&mut self, name: &str, error: &anyhow::Error) {
        self.session = None;
        self.screen = Screen::Menu;
        self.menu_error = Some(format!("Could not open table '{name}': {error:#}"));
    }

    pub fn apply_action(&mut self, action: Action) -> AppCommand {
        match action {
            Action::Quit => {
                self.running = false;
                AppCommand::None
            }
            Action::ReturnToMenu => {
                self.session = None;
                self.screen = Screen::Menu;
                self.input.clear();
                self.menu_error = None;
                AppCommand::RefreshTables
            }
            Action::Navigate(navigation) => {
                let layout = self.layout;
                let size = self.terminal_size;
                let row_limit = self.row_limit;
                if let Some(session) = self.session.as_mut() {
                    let metrics = session.metrics(&layout, size, row_limit);
                    session.navigate(navigation, &metrics);
                    debug!("viewport={:?}", session.viewport());
                }
                AppCommand::None
            }
            Action::SubmitInput => self.submit_input(),
            Action::CancelInput => {
                if self.input.is_empty() {
                    self.running = false;
                } else {
                    self.input.clear();
                    self.menu_error = None;
                }
                AppCommand::None
            }
            Action::Backspace => {
                self.input.pop();
                AppCommand::None
            }
            Action::InputChar(c) => {
                self.menu_error = None;
                self.input.push(c);
                AppCommand::None
            }
        }
    }

    fn submit_input(&mut self) -> AppCommand {
        let selection = self.input.trim().to_uppercase();
        self.input.clear();
        match selection.as_str() {
            "" => AppCommand::None,
            "Q" | "QUIT" | "EXIT" => {
                self.running = false;
                AppCommand::None
            }
            _ => AppCommand::LoadTable(selection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{App, AppCommand, Screen};
    use crate::input::Action;
    use crate::model::PropertyRecord;
    use crate::viewport::{LayoutConfig, Navigation};

    fn records(count: usize) -> Vec<PropertyRecord> {
        (0..count)
            .map(|index| PropertyRecord {
                section: format!("{}PFC", 100 + index),
                weight: 10.0 + index as f64,
                d: 100.0,
                bf: 50.0,
                tf: 6.0,
                tw: 5.0,
                ag: 1200.0,
                ix: 2.5,
                ..PropertyRecord::default()
            })
            .collect()
    }

    fn type_line(app: &mut App, line: &str) -> AppCommand {
        for c in line.chars() {
            app.apply_action(Action::InputChar(c));
        }
        app.apply_action(Action::SubmitInput)
    }

    #[test]
    fn submit_requests_uppercased_table() {
        let mut app = App::new(LayoutConfig::default());
        assert_eq!(
            type_line(&mut app, " pfc300 "),
            AppCommand::LoadTable("PFC300".to_string())
        );
        assert_eq!(app.input(), "");
        assert_eq!(app.screen(), Screen::Menu);
    }

    #[test]
    fn quit_words_stop_the_menu() {
        for word in ["q", "Quit", "EXIT"] {
            let mut app = App::new(LayoutConfig::default());
            assert_eq!(type_line(&mut app, word), AppCommand::None);
            assert!(!app.running());
        }
    }

    #[test]
    fn empty_submit_is_ignored() {
        let mut app = App::new(LayoutConfig::default());
        assert_eq!(type_line(&mut app, "   "), AppCommand::None);
        assert!(app.running());
    }

    #[test]
    fn rejected_selection_is_shown_until_typing() {
        let mut app = App::new(LayoutConfig::default());
        app.reject_selection("NOPE");
        assert_eq!(
            app.menu_error(),
            Some("Table 'NOPE' not found. Please try again...")
        );
        app.apply_action(Action::InputChar('U'));
        assert_eq!(app.menu_error(), None);
        assert!(app.running());
    }

    #[test]
    fn escape_clears_input_then_quits() {
        let mut app = App::new(LayoutConfig::default());
        app.apply_action(Action::InputChar('U'));
        app.apply_action(Action::CancelInput);
        assert_eq!(app.input(), "");
        assert!(app.running());
        app.apply_action(Action::CancelInput);
        assert!(!app.running());
    }

    #[test]
    fn opening_table_filters_columns_and_resets_viewport() {
        let mut app = App::new(LayoutConfig::default());
        app.set_terminal_size(120, 30);
        app.open_table("PFC", records(50));
        assert_eq!(app.screen(), Screen::Table);

        let session = app.session().unwrap();
        let names = session
            .columns()
            .iter()
            .map(|column| column.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Weight", "d", "bf", "tf", "tw", "Ag", "Ix"]);

        app.apply_action(Action::Navigate(Navigation::PageDown));
        app.apply_action(Action::Navigate(Navigation::NextColumnPage));
        let window = app.visible_window().unwrap();
        assert_eq!(window.rows, 20..40);
        assert_eq!(window.column_page, 1);
        assert_eq!(window.columns, 5..7);

        app.open_table("PFC", records(50));
        let window = app.visible_window().unwrap();
        assert_eq!(window.rows, 0..20);
        assert_eq!(window.column_page, 0);
    }

    #[test]
    fn resize_reclamps_scroll_on_next_window() {
        let mut app = App::new(LayoutConfig::default());
        app.set_terminal_size(120, 30);
        app.open_table("PFC", records(50));
        for _ in 0..5 {
            app.apply_action(Action::Navigate(Navigation::PageDown));
        }
        assert_eq!(app.session().unwrap().viewport().scroll_row(), 30);

        app.set_terminal_size(120, 50);
        let window = app.visible_window().unwrap();
        assert_eq!(window.rows, 10..50);
    }

    #[test]
    fn short_row_area_limits_paging() {
        let mut app = App::new(LayoutConfig::default());
        app.set_terminal_size(100, 10);
        app.set_row_limit(1);
        app.open_table("PFC", records(10));
        for _ in 0..20 {
            app.apply_action(Action::Navigate(Navigation::PageDown));
        }
        let window = app.visible_window().unwrap();
        assert_eq!(window.rows, 9..10);
    }

    #[test]
    fn frame_width_is_capped() {
        let mut app = App::new(LayoutConfig::default());
        app.set_terminal_size(320, 60);
        app.open_table("PFC", records(3));
        // 200 columns wide: (200 - 25) / 18 = 9 columns per page
        let session = app.session().unwrap();
        let metrics = session.metrics(app.layout(), app.terminal_size, None);
        assert_eq!(metrics.columns_per_page, 9);
        assert_eq!(app.terminal_size.height, 60);
    }

    #[test]
    fn return_to_menu_drops_session_and_refreshes() {
        let mut app = App::new(LayoutConfig::default());
        app.open_table("PFC", records(3));
        assert_eq!(
            app.apply_action(Action::ReturnToMenu),
            AppCommand::RefreshTables
        );
        assert_eq!(app.screen(), Screen::Menu);
        assert!(app.session().is_none());
        assert!(app.visible_window().is_none());
    }

    #[test]
    fn load_error_returns_to_menu_with_message() {
        let mut app = App::new(LayoutConfig::default());
        let error = anyhow::anyhow!("bad json").context("failed to parse table UB");
        app.set_load_error("UB", &error);
        assert_eq!(app.screen(), Screen::Menu);
        let message = app.menu_error().unwrap();
        assert!(message.contains("failed to parse table UB"));
        assert!(message.contains("bad json"));
    }
}
