use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::ui::{Component, EventResult, Result};

/// Width reserved for field labels so inputs line up.
pub const LABEL_WIDTH: usize = 12;

/// Single-line text input rendered as `label  value`.
///
/// Emits the full new value whenever an edit changes it. The cursor is kept
/// as a char index so multi-byte input edits cleanly.
pub struct TextField {
    label: String,
    required: bool,
    value: String,
    cursor: usize,
    placeholder: Option<String>,
    focused: bool,
}

impl TextField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required: false,
            value: String::new(),
            cursor: 0,
            placeholder: None,
            focused: false,
        }
    }

    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Replace the value from outside (e.g. after a form reset). The cursor
    /// moves to the end when the value actually changes.
    pub fn set_value(&mut self, value: &str) {
        if self.value != value {
            self.value = value.to_string();
            self.cursor = self.len();
        }
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn delete_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
        true
    }

    fn delete_at_cursor(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
        true
    }

    fn delete_word_before_cursor(&mut self) -> bool {
        let chars: Vec<char> = self.value.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && chars[start - 1] != ' ' {
            start -= 1;
        }
        if start == self.cursor {
            return false;
        }
        let (from, to) = (self.byte_offset(start), self.byte_offset(self.cursor));
        self.value.drain(from..to);
        self.cursor = start;
        true
    }

    fn clear(&mut self) -> bool {
        if self.value.is_empty() {
            return false;
        }
        self.value.clear();
        self.cursor = 0;
        true
    }

    fn changed(&self, changed: bool) -> EventResult<String> {
        if changed {
            self.value.clone().into()
        } else {
            EventResult::Consumed
        }
    }
}

impl Component for TextField {
    type Output = String;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match (key.code, key.modifiers) {
            (KeyCode::Backspace, KeyModifiers::ALT) | (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                let changed = self.delete_word_before_cursor();
                self.changed(changed)
            }
            (KeyCode::Backspace, _) => {
                let changed = self.delete_before_cursor();
                self.changed(changed)
            }
            (KeyCode::Delete, _) => {
                let changed = self.delete_at_cursor();
                self.changed(changed)
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let changed = self.clear();
                self.changed(changed)
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                EventResult::Consumed
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.len());
                EventResult::Consumed
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                EventResult::Consumed
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.len();
                EventResult::Consumed
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                self.value.clone().into()
            }

            // Tab, Enter, shortcuts: left to the screen
            _ => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let marker = if self.required { "*" } else { " " };
        let label_style = if self.focused {
            Style::default().fg(theme.lavender()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.overlay1())
        };

        let mut spans = vec![
            Span::styled(format!("{:>LABEL_WIDTH$}", self.label), label_style),
            Span::styled(format!("{marker} "), Style::default().fg(theme.red())),
        ];

        let input_style = Style::default().fg(theme.text());
        let cursor_style = Style::default().fg(theme.base()).bg(theme.text());
        let placeholder_style = Style::default().fg(theme.overlay0());

        match (&self.placeholder, self.value.is_empty(), self.focused) {
            (Some(placeholder), true, true) => {
                spans.push(Span::styled(" ", cursor_style));
                spans.push(Span::styled(placeholder.clone(), placeholder_style));
            }
            (Some(placeholder), true, false) => {
                spans.push(Span::styled(placeholder.clone(), placeholder_style));
            }
            (_, _, true) => {
                let before: String = self.value.chars().take(self.cursor).collect();
                let mut rest = self.value.chars().skip(self.cursor);
                let at_cursor = rest.next().unwrap_or(' ');
                let after: String = rest.collect();
                spans.push(Span::styled(before, input_style));
                spans.push(Span::styled(at_cursor.to_string(), cursor_style));
                spans.push(Span::styled(after, input_style));
            }
            (_, _, false) => spans.push(Span::styled(self.value.clone(), input_style)),
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(field: &mut TextField, code: KeyCode) -> EventResult<String> {
        field.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_str(field: &mut TextField, text: &str) {
        for c in text.chars() {
            press(field, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_emits_full_value() {
        let mut field = TextField::new("Name");
        assert_eq!(press(&mut field, KeyCode::Char('J')), EventResult::Event("J".into()));
        type_str(&mut field, "ane");
        assert_eq!(field.value(), "Jane");
    }

    #[test]
    fn edits_in_the_middle_of_multibyte_text() {
        let mut field = TextField::new("Name");
        type_str(&mut field, "Zoë");
        press(&mut field, KeyCode::Left);
        assert_eq!(press(&mut field, KeyCode::Backspace), EventResult::Event("Zë".into()));
        type_str(&mut field, "o");
        assert_eq!(field.value(), "Zoë");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn cursor_movement_is_consumed_without_event() {
        let mut field = TextField::new("Name");
        assert_eq!(press(&mut field, KeyCode::Left), EventResult::Consumed);
        assert_eq!(press(&mut field, KeyCode::Backspace), EventResult::Consumed);
    }

    #[test]
    fn word_delete_and_clear() {
        let mut field = TextField::new("Name");
        type_str(&mut field, "Team lunch");
        let result = field
            .handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(result, EventResult::Event("Team ".into()));

        let result = field
            .handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(result, EventResult::Event(String::new()));
    }

    #[test]
    fn navigation_keys_are_left_to_parent() {
        let mut field = TextField::new("Name");
        assert_eq!(press(&mut field, KeyCode::Tab), EventResult::Ignored);
        assert_eq!(press(&mut field, KeyCode::Enter), EventResult::Ignored);
    }

    #[test]
    fn set_value_moves_cursor_to_end() {
        let mut field = TextField::new("Name");
        field.set_value("Jane");
        assert_eq!(field.cursor(), 4);
        field.set_value("");
        assert_eq!(field.cursor(), 0);
    }
}
