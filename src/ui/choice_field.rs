use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::config::{FormAction, KeyResolver};
use crate::ui::{Component, EventResult, LABEL_WIDTH, Result};

/// Picks one of a fixed set of options, or nothing.
///
/// Cycling wraps through an empty slot so a selection can be withdrawn.
/// Emits the chosen option's text, or an empty string for no selection.
pub struct ChoiceField {
    label: String,
    options: &'static [&'static str],
    selected: Option<usize>,
    focused: bool,
    resolver: Arc<KeyResolver>,
}

impl ChoiceField {
    pub fn new(
        label: impl Into<String>,
        options: &'static [&'static str],
        resolver: Arc<KeyResolver>,
    ) -> Self {
        Self {
            label: label.into(),
            options,
            selected: None,
            focused: false,
            resolver,
        }
    }

    pub fn value(&self) -> &'static str {
        self.selected.map_or("", |i| self.options[i])
    }

    pub const fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Select the option with this exact text; anything else clears the
    /// selection.
    pub fn set_value(&mut self, value: &str) {
        self.selected = self.options.iter().position(|o| *o == value);
    }

    fn step(&mut self, forward: bool) -> EventResult<String> {
        let len = self.options.len();
        // Slot `len` stands for "nothing selected".
        let current = self.selected.unwrap_or(len);
        let next = if forward {
            (current + 1) % (len + 1)
        } else {
            (current + len) % (len + 1)
        };
        self.selected = (next < len).then_some(next);
        self.value().to_string().into()
    }
}

impl Component for ChoiceField {
    type Output = String;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_form(&key, FormAction::NextOption) {
            return Ok(self.step(true));
        }
        if self.resolver.matches_form(&key, FormAction::PrevOption) {
            return Ok(self.step(false));
        }
        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let label_style = if self.focused {
            Style::default().fg(theme.lavender()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.overlay1())
        };

        let mut spans = vec![
            Span::styled(format!("{:>LABEL_WIDTH$}", self.label), label_style),
            Span::styled("* ", Style::default().fg(theme.red())),
        ];

        let arrow_style = Style::default().fg(if self.focused { theme.peach() } else { theme.surface2() });
        spans.push(Span::styled("‹ ", arrow_style));
        match self.selected {
            Some(i) => spans.push(Span::styled(
                self.options[i],
                Style::default().fg(theme.text()).add_modifier(Modifier::BOLD),
            )),
            None => spans.push(Span::styled("choose", Style::default().fg(theme.overlay0()))),
        }
        spans.push(Span::styled(" ›", arrow_style));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    const OPTIONS: &[&str] = &["Travel", "Food", "Supplies", "Other"];

    fn press(field: &mut ChoiceField, code: KeyCode) -> EventResult<String> {
        field.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn cycles_forward_through_empty_slot() {
        let mut field = ChoiceField::new("Category", OPTIONS, Arc::new(KeyResolver::default()));
        assert_eq!(press(&mut field, KeyCode::Right), EventResult::Event("Travel".into()));
        for _ in 0..3 {
            press(&mut field, KeyCode::Right);
        }
        assert_eq!(field.value(), "Other");
        assert_eq!(press(&mut field, KeyCode::Right), EventResult::Event(String::new()));
    }

    #[test]
    fn cycles_backward_from_empty_to_last() {
        let mut field = ChoiceField::new("Category", OPTIONS, Arc::new(KeyResolver::default()));
        assert_eq!(press(&mut field, KeyCode::Left), EventResult::Event("Other".into()));
    }

    #[test]
    fn set_value_selects_matching_option() {
        let mut field = ChoiceField::new("Category", OPTIONS, Arc::new(KeyResolver::default()));
        field.set_value("Food");
        assert_eq!(field.value(), "Food");
        field.set_value("");
        assert_eq!(field.value(), "");
        assert_eq!(press(&mut field, KeyCode::Char('x')), EventResult::Ignored);
    }
}
