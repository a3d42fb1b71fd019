use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::ui::Component;

const TOAST_DURATION: Duration = Duration::from_secs(4);
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    toast_type: ToastType,
    created_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            created_at: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Error)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= TOAST_DURATION
    }
}

/// Short-lived notifications stacked in the bottom-right corner.
#[derive(Default)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, toast: Toast) {
        self.toasts.push_back(toast);
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    fn expire(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.is_expired(now));
    }
}

impl Component for ToastManager {
    type Output = ();

    fn handle_tick(&mut self) {
        self.expire(Instant::now());
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        const HEIGHT: u16 = 3;
        let width = 50u16.min(area.width.saturating_sub(4));

        // Newest at the bottom, older ones stacked above.
        for (i, toast) in self.toasts.iter().rev().enumerate() {
            let offset = u16::try_from(i).unwrap_or(u16::MAX).saturating_mul(HEIGHT);
            let Some(y) = (area.y + area.height).checked_sub(HEIGHT + offset + 1) else {
                break;
            };
            if y < area.y {
                break;
            }
            let x = area.x + area.width.saturating_sub(width + 2);
            let toast_area = Rect::new(x, y, width, HEIGHT);

            let (color, icon) = match toast.toast_type {
                ToastType::Success => (theme.green(), "✓"),
                ToastType::Error => (theme.red(), "✗"),
            };

            frame.render_widget(Clear, toast_area);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(theme.surface0()));

            let paragraph = Paragraph::new(format!("{icon} {}", toast.message))
                .style(Style::default().fg(theme.text()).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, toast_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_toasts() {
        let mut toasts = ToastManager::new();
        for i in 0..5 {
            toasts.show(Toast::success(format!("toast {i}")));
        }
        let messages: Vec<_> = toasts.visible().map(Toast::message).collect();
        assert_eq!(messages, ["toast 2", "toast 3", "toast 4"]);
    }

    #[test]
    fn expired_toasts_are_dropped() {
        let mut toasts = ToastManager::new();
        toasts.show(Toast::error("boom"));
        toasts.expire(Instant::now() + TOAST_DURATION);
        assert_eq!(toasts.visible().count(), 0);
    }
}
