use serde::Deserialize;
use std::ops::Range;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub label_column_width: u16,
    pub column_width: u16,
    /// Lines taken by the title box, column headers and footer.
    pub reserved_lines: u16,
    pub min_visible_rows: u16,
    pub fallback_width: u16,
    pub fallback_height: u16,
    pub min_width: u16,
    pub max_width: u16,
    pub min_height: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_column_width: 25,
            column_width: 18,
            reserved_lines: 10,
            min_visible_rows: 3,
            fallback_width: 120,
            fallback_height: 40,
            min_width: 80,
            max_width: 200,
            min_height: 10,
        }
    }
}

impl LayoutConfig {
    pub fn columns_per_page(&self, width: u16) -> usize {
        let usable = width.saturating_sub(self.label_column_width) as usize;
        (usable / self.column_width.max(1) as usize).max(1)
    }

    pub fn visible_rows(&self, height: u16) -> usize {
        height
            .saturating_sub(self.reserved_lines)
            .max(self.min_visible_rows)
            .max(1) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

impl TerminalSize {
    /// Queries the terminal, falling back to the configured size when the
    /// query fails or reports something too small to lay a table out in.
    pub fn detect(layout: &LayoutConfig) -> Self {
        match crossterm::terminal::size() {
            Ok((width, height)) => Self::sanitize(layout, width, height),
            Err(error) => {
                debug!("terminal size unavailable, using fallback: {error}");
                Self::fallback(layout)
            }
        }
    }

    pub fn fallback(layout: &LayoutConfig) -> Self {
        Self {
            width: layout.fallback_width,
            height: layout.fallback_height,
        }
    }

    pub fn sanitize(layout: &LayoutConfig, width: u16, height: u16) -> Self {
        let width = if width < layout.min_width {
            layout.fallback_width
        } else {
            width.min(layout.max_width)
        };
        let height = if height < layout.min_height {
            layout.fallback_height
        } else {
            height
        };
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportMetrics {
    pub columns_per_page: usize,
    pub visible_rows: usize,
    pub total_rows: usize,
    pub total_columns: usize,
}

impl ViewportMetrics {
    pub fn new(
        layout: &LayoutConfig,
        size: TerminalSize,
        total_rows: usize,
        total_columns: usize,
    ) -> Self {
        Self::from_parts(
            layout.columns_per_page(size.width),
            layout.visible_rows(size.height),
            total_rows,
            total_columns,
        )
    }

    pub fn from_parts(
        columns_per_page: usize,
        visible_rows: usize,
        total_rows: usize,
        total_columns: usize,
    ) -> Self {
        Self {
            columns_per_page: columns_per_page.max(1),
            visible_rows: visible_rows.max(1),
            total_rows,
            total_columns,
        }
    }

    pub fn limit_rows(mut self, limit: usize) -> Self {
        self.visible_rows = self.visible_rows.min(limit).max(1);
        self
    }

    pub fn total_column_pages(&self) -> usize {
        self.total_columns.div_ceil(self.columns_per_page)
    }

    pub fn last_column_page(&self) -> usize {
        self.total_column_pages().saturating_sub(1)
    }

    pub fn max_scroll(&self) -> usize {
        self.total_rows.saturating_sub(self.visible_rows)
    }

    pub fn column_range(&self, page: usize) -> Range<usize> {
        let start = (page * self.columns_per_page).min(self.total_columns);
        let end = (start + self.columns_per_page).min(self.total_columns);
        start..end
    }

    pub fn row_range(&self, scroll_row: usize) -> Range<usize> {
        let start = scroll_row.min(self.total_rows);
        let end = (start + self.visible_rows).min(self.total_rows);
        start..end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    NextColumnPage,
    PrevColumnPage,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportWindow {
    pub columns: Range<usize>,
    pub rows: Range<usize>,
    pub column_page: usize,
    pub total_column_pages: usize,
    pub total_rows: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportState {
    column_page: usize,
    scroll_row: usize,
}

impl ViewportState {
    pub fn column_page(&self) -> usize {
        self.column_page
    }

    pub fn scroll_row(&self) -> usize {
        self.scroll_row
    }

    pub fn clamp(&mut self, metrics: &ViewportMetrics) {
        self.scroll_row = self.scroll_row.min(metrics.max_scroll());
        self.column_page = self.column_page.min(metrics.last_column_page());
    }

    pub fn window(&mut self, metrics: &ViewportMetrics) -> ViewportWindow {
        self.clamp(metrics);
        ViewportWindow {
            columns: metrics.column_range(self.column_page),
            rows: metrics.row_range(self.scroll_row),
            column_page: self.column_page,
            total_column_pages: metrics.total_column_pages(),
            total_rows: metrics.total_rows,
        }
    }

    pub fn apply(&mut self, navigation: Navigation, metrics: &ViewportMetrics) {
        let max_scroll = metrics.max_scroll();
        match navigation {
            Navigation::NextColumnPage => {
                if self.column_page + 1 < metrics.total_column_pages() {
                    self.column_page += 1;
                }
            }
            Navigation::PrevColumnPage => {
                self.column_page = self.column_page.saturating_sub(1);
            }
            Navigation::ScrollDown => {
                self.scroll_row = (self.scroll_row + 1).min(max_scroll);
            }
            Navigation::ScrollUp => {
                self.scroll_row = self.scroll_row.saturating_sub(1);
            }
            Navigation::PageDown => {
                self.scroll_row = self
                    .scroll_row
                    .saturating_add(metrics.visible_rows)
                    .min(max_scroll);
            }
            Navigation::PageUp => {
                self.scroll_row = self.scroll_row.saturating_sub(metrics.visible_rows);
            }
        }
    }
}
