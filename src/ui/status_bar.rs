use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver};
use crate::ui::Keybinding;

const APP_NAME: &str = "recordesk";

/// Bottom bar: active form, background work, and key hints.
pub struct StatusBar {
    resolver: Arc<KeyResolver>,
}

impl StatusBar {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self { resolver }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        screen_title: &str,
        running_commands: usize,
        local_keybindings: &[Keybinding],
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [info_area, keys_area] =
            Layout::horizontal([Constraint::Length(30), Constraint::Min(20)]).areas(inner);

        let activity = if running_commands == 0 {
            Span::styled("idle", Style::default().fg(theme.overlay0()))
        } else {
            Span::styled(
                format!("{running_commands} running"),
                Style::default().fg(theme.yellow()),
            )
        };
        let info = vec![
            Line::from(vec![
                Span::styled(APP_NAME, Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD)),
                Span::styled(" · ", Style::default().fg(theme.surface2())),
                Span::styled(screen_title.to_string(), Style::default().fg(theme.blue())),
            ]),
            Line::from(activity),
        ];
        frame.render_widget(Paragraph::new(info), info_area);

        let hints: Vec<Keybinding> = local_keybindings
            .iter()
            .cloned()
            .chain(self.global_keybindings())
            .collect();
        render_hints(frame, keys_area, theme, &hints);
    }

    fn global_keybindings(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::new(
                format!(
                    "{}/{}",
                    self.resolver.display_global(GlobalAction::PrevTab),
                    self.resolver.display_global(GlobalAction::NextTab)
                ),
                "Switch form",
            ),
            Keybinding::new(self.resolver.display_global(GlobalAction::Quit), "Quit"),
        ]
    }
}

/// Lay the hints out in as many aligned columns as fit, filling top to bottom.
fn render_hints(frame: &mut Frame, area: Rect, theme: &Theme, hints: &[Keybinding]) {
    if hints.is_empty() || area.height == 0 {
        return;
    }

    let key_w = hints.iter().map(|kb| kb.key.chars().count()).max().unwrap_or(1);
    let desc_w = hints.iter().map(|kb| kb.description.chars().count()).max().unwrap_or(1);
    // key + " │ " + description + gap
    let col_width = u16::try_from(key_w + 3 + desc_w + 2).unwrap_or(u16::MAX);
    let num_cols = (area.width / col_width).max(1) as usize;
    let num_rows = area.height as usize;

    let mut columns: Vec<Vec<Line>> = vec![Vec::new(); num_cols];
    for (i, kb) in hints.iter().enumerate() {
        let col = i / num_rows;
        if col >= num_cols {
            break;
        }
        columns[col].push(Line::from(vec![
            Span::styled(format!("{:>key_w$}", kb.key), Style::default().fg(theme.peach())),
            Span::styled(" │ ", Style::default().fg(theme.surface2())),
            Span::styled(kb.description.clone(), Style::default().fg(theme.subtext0())),
        ]));
    }

    let col_areas = Layout::horizontal(vec![Constraint::Length(col_width); num_cols]).split(area);
    for (lines, col_area) in columns.into_iter().zip(col_areas.iter()) {
        frame.render_widget(Paragraph::new(lines), *col_area);
    }
}
