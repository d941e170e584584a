use anyhow::{Context, Result};
use crossterm::queue;
use crossterm::style::{
    Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor,
};
use ratatui::style::Color;
use std::io::Write;

use crate::app::TableSession;
use crate::catalog::is_placeholder;
use crate::ui::{
    ACCENT, BG, BG_LIGHT, BORDER_BRIGHT, SECTION_HEADER, TEXT, TEXT_BRIGHT, TEXT_DIM,
    box_inner_width, clean_section_name, pad_cell,
};
use crate::viewport::{LayoutConfig, TerminalSize, ViewportMetrics};

pub fn print_table_once<W: Write>(
    out: &mut W,
    session: &TableSession,
    layout: &LayoutConfig,
    size: TerminalSize,
) -> Result<()> {
    let metrics = ViewportMetrics::new(
        layout,
        size,
        session.records().len(),
        session.columns().len(),
    );
    let pages = metrics.total_column_pages().max(1);
    let width = size.width as usize;

    for page in 0..pages {
        let columns = &session.columns()[metrics.column_range(page)];
        let title = format!("STEEL PROPERTIES: {}", session.name().to_uppercase());
        let info = format!(
            "Page {}/{} | {} entries",
            page + 1,
            pages,
            session.records().len()
        );
        write_title_box(out, &title, &info, width)?;

        let label_width = layout.label_column_width as usize;
        let column_width = layout.column_width as usize;
        let used = label_width + columns.len() * column_width;
        let remaining = width.saturating_sub(used);

        let mut header = pad_cell(SECTION_HEADER, label_width);
        for column in columns {
            header.push_str(&pad_cell(&column.header(), column_width));
        }
        header.push_str(&" ".repeat(remaining));
        write_line(out, BG_LIGHT, &[(ACCENT, header)])?;
        write_line(out, BG_LIGHT, &[(BORDER_BRIGHT, "─".repeat(used + remaining))])?;

        for (index, record) in session.records().iter().enumerate() {
            let bg = if index % 2 == 0 { BG } else { BG_LIGHT };
            let mut cells = vec![(
                TEXT_BRIGHT,
                pad_cell(&clean_section_name(&record.section), label_width),
            )];
            for column in columns {
                let value = column.value(record);
                let fg = if is_placeholder(&value) { TEXT_DIM } else { TEXT };
                cells.push((fg, pad_cell(&value, column_width)));
            }
            cells.push((TEXT, " ".repeat(remaining)));
            write_line(out, bg, &cells)?;
        }

        if page + 1 < pages {
            queue!(out, Print("\n")).context("failed to write table")?;
        }
    }

    out.flush().context("failed to flush table output")?;
    Ok(())
}

fn write_title_box<W: Write>(out: &mut W, title: &str, info: &str, width: usize) -> Result<()> {
    let content = title.chars().count().max(info.chars().count());
    let inner = box_inner_width(content, width);
    let offset = width.saturating_sub(inner + 2) / 2;
    let margin = " ".repeat(offset);
    let trailing = " ".repeat(width.saturating_sub(offset + inner + 2));

    let centered = |text: &str| {
        let len = text.chars().count().min(inner);
        let left = (inner - len) / 2;
        format!(
            "{}{}{}",
            " ".repeat(left),
            text.chars().take(inner).collect::<String>(),
            " ".repeat(inner - len - left)
        )
    };

    write_line(
        out,
        BG,
        &[
            (TEXT, margin.clone()),
            (BORDER_BRIGHT, format!("╔{}╗", "═".repeat(inner))),
            (TEXT, trailing.clone()),
        ],
    )?;
    for (color, text) in [(ACCENT, title), (TEXT_DIM, info)] {
        write_line(
            out,
            BG,
            &[
                (TEXT, margin.clone()),
                (BORDER_BRIGHT, "║".to_string()),
                (color, centered(text)),
                (BORDER_BRIGHT, "║".to_string()),
                (TEXT, trailing.clone()),
            ],
        )?;
    }
    write_line(
        out,
        BG,
        &[
            (TEXT, margin.clone()),
            (BORDER_BRIGHT, format!("╚{}╝", "═".repeat(inner))),
            (TEXT, trailing),
        ],
    )?;
    queue!(out, Print("\n")).context("failed to write table")?;
    Ok(())
}

fn write_line<W: Write>(out: &mut W, bg: Color, spans: &[(Color, String)]) -> Result<()> {
    queue!(out, SetBackgroundColor(term_color(bg))).context("failed to write table")?;
    for (fg, text) in spans {
        queue!(out, SetForegroundColor(term_color(*fg)), Print(text))
            .context("failed to write table")?;
    }
    queue!(out, ResetColor, Print("\n")).context("failed to write table")?;
    Ok(())
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        _ => TermColor::Reset,
    }
}
