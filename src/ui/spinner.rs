use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use throbber_widgets_tui::WhichUse::Spin;
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, ThrobberState};

use crate::Theme;
use crate::ui::Component;

/// Animated one-line "busy" indicator, centered in its area.
pub struct Spinner {
    state: ThrobberState,
    label: String,
}

impl Spinner {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            state: ThrobberState::default(),
            label: label.into(),
        }
    }
}

impl Component for Spinner {
    type Output = ();

    fn handle_tick(&mut self) {
        self.state.calc_next();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let throbber = Throbber::default()
            .throbber_set(BRAILLE_SIX)
            .use_type(Spin)
            .throbber_style(Style::default().fg(theme.lavender()))
            .style(Style::default().fg(theme.subtext1()))
            .label(self.label.clone());

        // glyph + space + label
        let width = u16::try_from(self.label.chars().count() + 2).unwrap_or(area.width);
        let area = area.centered(Constraint::Length(width), Constraint::Length(1));

        frame.render_stateful_widget(throbber, area, &mut self.state);
    }
}
