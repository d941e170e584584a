use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};

use crate::app::{App, Screen, TableSession};
use crate::catalog::is_placeholder;
use crate::viewport::{LayoutConfig, ViewportWindow};

pub(crate) const BG: Color = Color::Rgb(26, 27, 38);
pub(crate) const BG_LIGHT: Color = Color::Rgb(36, 40, 59);
pub(crate) const TEXT: Color = Color::Rgb(192, 202, 245);
pub(crate) const TEXT_DIM: Color = Color::Rgb(115, 131, 168);
pub(crate) const TEXT_BRIGHT: Color = Color::Rgb(255, 255, 255);
pub(crate) const ACCENT: Color = Color::Rgb(111, 236, 206);
pub(crate) const BLUE: Color = Color::Rgb(125, 162, 206);
pub(crate) const ERROR: Color = Color::Rgb(247, 118, 142);
pub(crate) const BORDER_BRIGHT: Color = Color::Rgb(122, 162, 247);

pub(crate) const SECTION_HEADER: &str = "Section";
const MIN_BOX_WIDTH: usize = 60;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(BG)), area);
    app.set_terminal_size(area.width, area.height);

    match app.screen() {
        Screen::Menu => render_menu(frame, area, app),
        Screen::Table => render_table_screen(frame, area, app),
    }
}

fn render_table_screen(frame: &mut Frame, area: Rect, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    app.set_row_limit(root[4].height);
    let Some(window) = app.visible_window() else {
        render_menu(frame, area, app);
        return;
    };
    let layout = *app.layout();
    let Some(session) = app.session() else {
        return;
    };

    let title = format!("STEEL PROPERTIES: {}", session.name().to_uppercase());
    let info = format!(
        "Page {}/{} | {} entries",
        window.column_page + 1,
        window.total_column_pages.max(1),
        window.total_rows
    );
    render_title_box(frame, root[0], &title, Some(&info));
    render_column_headers(frame, root[2], root[3], session, &window, &layout);
    render_rows(frame, root[4], session, &window, &layout);
    render_row_info(frame, root[5], &window);
    render_key_hints(frame, root[6]);
}

fn render_title_box(frame: &mut Frame, area: Rect, title: &str, info: Option<&str>) {
    let box_area = title_box_area(area, title, info);
    let mut lines = vec![Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))];
    if let Some(info) = info {
        lines.push(Line::from(Span::styled(
            info.to_string(),
            Style::default().fg(TEXT_DIM),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(BORDER_BRIGHT))
        .style(Style::default().bg(BG));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        box_area,
    );
}

fn title_box_area(area: Rect, title: &str, info: Option<&str>) -> Rect {
    let content = title
        .chars()
        .count()
        .max(info.map(|info| info.chars().count()).unwrap_or(0));
    let width = box_inner_width(content, area.width as usize) as u16 + 2;
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    }
}

pub(crate) fn box_inner_width(content: usize, terminal_width: usize) -> usize {
    (content + 6)
        .max(MIN_BOX_WIDTH)
        .min(terminal_width.saturating_sub(4))
}

fn column_widths(session_columns: usize, layout: &LayoutConfig) -> Vec<Constraint> {
    let mut widths = Vec::with_capacity(session_columns + 1);
    widths.push(Constraint::Length(layout.label_column_width));
    widths.extend((0..session_columns).map(|_| Constraint::Length(layout.column_width)));
    widths
}

fn render_column_headers(
    frame: &mut Frame,
    header_area: Rect,
    separator_area: Rect,
    session: &TableSession,
    window: &ViewportWindow,
    layout: &LayoutConfig,
) {
    let visible = &session.columns()[window.columns.clone()];
    let mut cells = vec![Cell::from(pad_cell(
        SECTION_HEADER,
        layout.label_column_width as usize,
    ))];
    cells.extend(
        visible
            .iter()
            .map(|column| Cell::from(pad_cell(&column.header(), layout.column_width as usize))),
    );
    let header = Row::new(cells).style(
        Style::default()
            .bg(BG_LIGHT)
            .fg(ACCENT)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(vec![header], column_widths(visible.len(), layout))
        .column_spacing(0)
        .style(Style::default().bg(BG_LIGHT));
    frame.render_widget(table, header_area);

    frame.render_widget(
        Paragraph::new("─".repeat(separator_area.width as usize))
            .style(Style::default().bg(BG_LIGHT).fg(BORDER_BRIGHT)),
        separator_area,
    );
}

fn render_rows(
    frame: &mut Frame,
    area: Rect,
    session: &TableSession,
    window: &ViewportWindow,
    layout: &LayoutConfig,
) {
    let visible = &session.columns()[window.columns.clone()];
    let label_width = layout.label_column_width as usize;
    let column_width = layout.column_width as usize;

    let rows = session.records()[window.rows.clone()]
        .iter()
        .enumerate()
        .map(|(offset, record)| {
            let absolute = window.rows.start + offset;
            let bg = if absolute % 2 == 0 { BG } else { BG_LIGHT };
            let mut cells = vec![Cell::from(Span::styled(
                pad_cell(&clean_section_name(&record.section), label_width),
                Style::default().fg(TEXT_BRIGHT),
            ))];
            cells.extend(visible.iter().map(|column| {
                let value = column.value(record);
                let fg = if is_placeholder(&value) { TEXT_DIM } else { TEXT };
                Cell::from(Span::styled(
                    pad_cell(&value, column_width),
                    Style::default().fg(fg),
                ))
            }));
            Row::new(cells).style(Style::default().bg(bg))
        })
        .collect::<Vec<_>>();

    let table = Table::new(rows, column_widths(visible.len(), layout))
        .column_spacing(0)
        .style(Style::default().bg(BG));
    frame.render_widget(table, area);
}

fn render_row_info(frame: &mut Frame, area: Rect, window: &ViewportWindow) {
    let first = if window.rows.is_empty() {
        0
    } else {
        window.rows.start + 1
    };
    let line = Line::from(vec![
        Span::styled("Rows ", Style::default().fg(TEXT_DIM)),
        Span::styled(
            format!("{first}–{}", window.rows.end),
            Style::default().fg(ACCENT),
        ),
        Span::styled(" of ", Style::default().fg(TEXT_DIM)),
        Span::styled(window.total_rows.to_string(), Style::default().fg(ACCENT)),
    ]);
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .style(Style::default().bg(BG)),
        area,
    );
}

fn render_key_hints(frame: &mut Frame, area: Rect) {
    let key = |label: &'static str| Span::styled(label, Style::default().fg(ACCENT));
    let text = |label: &'static str| Span::styled(label, Style::default().fg(TEXT));
    let line = Line::from(vec![
        key("←"),
        text(" "),
        key("→"),
        text(" pages  |  "),
        key("↑"),
        text(" "),
        key("↓"),
        text(" scroll  |  "),
        key("PgUp/PgDn"),
        text(" jump  |  "),
        key("m"),
        text(" menu  |  "),
        Span::styled("q", Style::default().fg(ERROR)),
        text(" quit"),
    ]);
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .style(Style::default().bg(BG)),
        area,
    );
}

fn render_menu(frame: &mut Frame, area: Rect, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_title_box(frame, root[0], "STEEL TABLES VIEWER", None);
    frame.render_widget(
        Paragraph::new("▶ AVAILABLE STEEL TABLES:")
            .style(Style::default().bg(BG).fg(ACCENT)),
        root[2],
    );
    render_table_list(frame, root[3], app);

    let instructions = vec![
        Line::from(Span::styled("▶ INSTRUCTIONS:", Style::default().fg(ACCENT))),
        Line::from(Span::styled(
            "  • Type the table name (e.g., PFC300, RHS450, UB350)",
            Style::default().fg(TEXT),
        )),
        Line::from(Span::styled(
            "  • Type q or quit to exit",
            Style::default().fg(TEXT),
        )),
        Line::from(Span::styled(
            "  • Press Enter to confirm your selection",
            Style::default().fg(TEXT),
        )),
    ];
    frame.render_widget(
        Paragraph::new(instructions).style(Style::default().bg(BG)),
        root[5],
    );

    let prompt = "▶ SELECT TABLE: ";
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(prompt, Style::default().fg(ACCENT)),
            Span::styled(app.input().to_string(), Style::default().fg(TEXT_BRIGHT)),
        ]))
        .style(Style::default().bg(BG)),
        root[7],
    );
    let cursor_x = root[7].x + (prompt.chars().count() + app.input().chars().count()) as u16;
    if cursor_x < root[7].x + root[7].width {
        frame.set_cursor_position((cursor_x, root[7].y));
    }

    if let Some(error) = app.menu_error() {
        frame.render_widget(
            Paragraph::new(format!("✗ {error}")).style(Style::default().bg(BG).fg(ERROR)),
            root[8],
        );
    }
}

fn render_table_list(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(error) = app.tables_error() {
        frame.render_widget(
            Paragraph::new(format!("✗ {error}")).style(Style::default().bg(BG).fg(ERROR)),
            area,
        );
        return;
    }
    if app.tables().is_empty() {
        frame.render_widget(
            Paragraph::new("  (no tables found)").style(Style::default().bg(BG).fg(TEXT_DIM)),
            area,
        );
        return;
    }

    let lines = table_list_lines(app.tables(), area.width as usize);
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(BG)),
        area,
    );
}

fn table_list_lines(tables: &[String], width: usize) -> Vec<Line<'static>> {
    let cell_width = tables
        .iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0)
        + 6;
    let per_line = (width / cell_width.max(1)).max(1);

    tables
        .chunks(per_line)
        .enumerate()
        .map(|(line_index, chunk)| {
            let spans = chunk
                .iter()
                .enumerate()
                .flat_map(|(offset, name)| {
                    let index = line_index * per_line + offset;
                    let (bullet, text) = if index % 2 == 0 {
                        (ACCENT, TEXT_BRIGHT)
                    } else {
                        (BLUE, TEXT)
                    };
                    [
                        Span::styled("  ● ", Style::default().fg(bullet)),
                        Span::styled(
                            pad_cell(name, cell_width - 4),
                            Style::default().fg(text),
                        ),
                    ]
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

/// Drops the grade suffix from names like `310UB40.4 (G300)`.
pub(crate) fn clean_section_name(section: &str) -> String {
    if let Some(start) = section.find(" (G")
        && let Some(close) = section[start..].find(')')
    {
        let mut cleaned = section[..start].to_string();
        cleaned.push_str(&section[start + close + 1..]);
        return cleaned;
    }
    section.to_string()
}

pub(crate) fn truncate_cell(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    if max_chars <= 2 {
        return value.chars().take(max_chars).collect();
    }
    let mut out = value
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    out.push('.');
    out
}

pub(crate) fn pad_cell(value: &str, width: usize) -> String {
    let text = truncate_cell(value, width.saturating_sub(1));
    format!("{text:<width$}")
}

#[cfg(test)]
mod tests {
    use super::{box_inner_width, clean_section_name, pad_cell, render, truncate_cell};
    use crate::app::App;
    use crate::input::Action;
    use crate::model::PropertyRecord;
    use crate::viewport::{LayoutConfig, Navigation};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn section_names_lose_grade_suffix() {
        assert_eq!(clean_section_name("310UB40.4 (G300)"), "310UB40.4");
        assert_eq!(clean_section_name("75x75x6 EA (G300) HR"), "75x75x6 EA HR");
        assert_eq!(clean_section_name("300PFC"), "300PFC");
        assert_eq!(clean_section_name("odd (G300"), "odd (G300");
    }

    #[test]
    fn cells_truncate_with_marker() {
        assert_eq!(truncate_cell("Weight (kg/m)", 17), "Weight (kg/m)");
        assert_eq!(truncate_cell("C,N,S__1 (mm³) long", 10), "C,N,S__1 .");
        assert_eq!(truncate_cell("abc", 2), "ab");
        assert_eq!(pad_cell("12.5", 6), "12.5  ");
        assert_eq!(pad_cell("1234567", 6), "1234. ");
    }

    #[test]
    fn title_box_respects_bounds() {
        assert_eq!(box_inner_width(10, 200), 60);
        assert_eq!(box_inner_width(70, 200), 76);
        assert_eq!(box_inner_width(70, 50), 46);
    }

    #[test]
    fn menu_lists_tables_and_errors() {
        let mut app = App::new(LayoutConfig::default());
        app.set_tables(vec!["PFC300".to_string(), "UB".to_string()]);
        app.reject_selection("NOPE");

        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("STEEL TABLES VIEWER"));
        assert!(text.contains("PFC300"));
        assert!(text.contains("UB"));
        assert!(text.contains("Table 'NOPE' not found"));
    }

    #[test]
    fn table_screen_shows_visible_window() {
        let mut app = App::new(LayoutConfig::default());
        let records = (0..30)
            .map(|index| PropertyRecord {
                section: format!("{}PFC (G300)", 100 + index),
                weight: 10.5 + index as f64,
                d: 100.0,
                ..PropertyRecord::default()
            })
            .collect();
        app.open_table("pfc", records);

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("STEEL PROPERTIES: PFC"));
        assert!(text.contains("Page 1/1 | 30 entries"));
        assert!(text.contains("Weight (kg/m)"));
        assert!(text.contains("100PFC"));
        assert!(!text.contains("(G300)"));
        assert!(text.contains("109PFC"));
        assert!(!text.contains("110PFC"));
        assert!(text.contains("Rows 1–10 of 30"));
    }

    #[test]
    fn short_terminal_can_scroll_to_last_row() {
        let mut app = App::new(LayoutConfig::default());
        let records = (0..10)
            .map(|index| PropertyRecord {
                section: format!("ROW{index:02}X"),
                weight: 10.0 + index as f64,
                ..PropertyRecord::default()
            })
            .collect();
        app.open_table("pfc", records);

        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();
        for _ in 0..20 {
            app.apply_action(Action::Navigate(Navigation::PageDown));
        }
        terminal.draw(|frame| render(frame, &mut app)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("ROW09X"));
        assert!(text.contains("Rows 10–10 of 10"));
    }
}
