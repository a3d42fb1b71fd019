use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table as RatatuiTable, TableState};

use crate::Theme;
use crate::ui::Component;

/// Column definition for a table.
pub struct ColumnDef {
    pub header: &'static str,
    pub constraint: Constraint,
}

impl ColumnDef {
    pub const fn new(header: &'static str, constraint: Constraint) -> Self {
        Self { header, constraint }
    }
}

/// Trait for items that can be displayed in a table.
pub trait TableRow {
    fn columns() -> &'static [ColumnDef];

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>>;
}

/// Read-only scrolling table.
pub struct Table<T: TableRow> {
    items: Vec<T>,
    state: TableState,
    title: String,
}

impl<T: TableRow> Table<T> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            state: TableState::default(),
            title: title.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the rows, keeping the selection in range.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        if self.items.is_empty() {
            self.state.select(None);
        } else {
            let last = self.items.len() - 1;
            self.state.select(Some(self.state.selected().unwrap_or(0).min(last)));
        }
    }

    pub fn scroll_down(&mut self, step: usize) {
        if let Some(i) = self.state.selected() {
            let last = self.items.len().saturating_sub(1);
            self.state.select(Some((i + step).min(last)));
        }
    }

    pub fn scroll_up(&mut self, step: usize) {
        if let Some(i) = self.state.selected() {
            self.state.select(Some(i.saturating_sub(step)));
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected()
    }
}

impl<T: TableRow> Component for Table<T> {
    type Output = ();

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let columns = T::columns();

        let header = Row::new(columns.iter().map(|c| {
            Cell::from(c.header).style(Style::default().fg(theme.subtext0()).add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(theme.surface0()));

        let rows = self
            .items
            .iter()
            .map(|item| Row::new(item.render_cells(theme)).style(Style::default().fg(theme.text())));

        let widths: Vec<Constraint> = columns.iter().map(|c| c.constraint).collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()))
            .title(self.title.as_str())
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD));

        let table = RatatuiTable::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut self.state);
    }
}
