//! Form screens.
//!
//! Screens follow the Elm architecture with a single-funnel update pattern:
//! - `init()` queues initial message(s)
//! - `handle_key()` queues messages from user input
//! - `handle_tick()` advances animations
//! - `update()` processes all queued messages
//!
//! Only `update()` can return commands or report errors, so every remote
//! call starts in one place.

mod entity;
mod greeting;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::commands::Command;
use crate::ui::Keybinding;

pub use entity::{EntityMsg, EntityScreen};
pub use greeting::{GreetingMsg, GreetingScreen};

/// Result from `update()`
pub enum UpdateResult {
    /// No action needed
    Idle,
    /// Spawn these commands
    Commands(Vec<Box<dyn Command>>),
    /// Report an error. Commands queued in the same update still run.
    Error {
        message: String,
        commands: Vec<Box<dyn Command>>,
    },
}

impl<T: Command> From<T> for UpdateResult {
    fn from(value: T) -> Self {
        Self::Commands(vec![Box::new(value)])
    }
}

impl UpdateResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            commands: Vec::new(),
        }
    }

    fn into_parts(self) -> (Option<String>, Vec<Box<dyn Command>>) {
        match self {
            Self::Idle => (None, Vec::new()),
            Self::Commands(commands) => (None, commands),
            Self::Error { message, commands } => (Some(message), commands),
        }
    }

    /// Fold the result of one processed message into an accumulated one.
    /// The first error wins; commands from every message are kept.
    fn merge(self, next: Self) -> Self {
        let (error, mut commands) = self.into_parts();
        let (next_error, more) = next.into_parts();
        commands.extend(more);
        match error.or(next_error) {
            Some(message) => Self::Error { message, commands },
            None if commands.is_empty() => Self::Idle,
            None => Self::Commands(commands),
        }
    }
}

/// One tab of the application.
///
/// The App calls methods in this order:
///
/// 1. `init()` - once at startup
/// 2. `update()` - immediately after init to process startup messages
/// 3. For each event:
///    - `handle_tick()` if tick event
///    - `handle_key()` if key event, then `update()` if consumed
/// 4. When a command completes: `update()`
pub trait Screen {
    /// Queue startup message(s).
    fn init(&mut self) {}

    /// Advance animations. Must not queue messages.
    fn handle_tick(&mut self) {}

    /// Queue messages for a key press. Returns `true` if the key was consumed.
    fn handle_key(&mut self, key: KeyEvent) -> bool;

    /// Process all queued messages.
    fn update(&mut self) -> UpdateResult;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Tab label.
    fn title(&self) -> &'static str;

    /// Keys shown in the status bar while this screen is active.
    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct Noop;

    #[async_trait]
    impl Command for Noop {
        fn name(&self) -> String {
            "noop".into()
        }

        async fn execute(self: Box<Self>) -> color_eyre::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn merge_keeps_commands_and_first_error() {
        let merged = UpdateResult::Idle.merge(Noop.into()).merge(Noop.into());
        assert!(matches!(&merged, UpdateResult::Commands(c) if c.len() == 2));

        let merged = merged
            .merge(UpdateResult::error("first"))
            .merge(UpdateResult::error("second"));
        assert!(matches!(&merged, UpdateResult::Error { message, commands }
            if message == "first" && commands.len() == 2));
    }

    #[test]
    fn commands_after_an_error_still_run() {
        let merged = UpdateResult::error("bad field").merge(Noop.into()).merge(UpdateResult::Idle);
        assert!(matches!(&merged, UpdateResult::Error { message, commands }
            if message == "bad field" && commands.len() == 1));

        assert!(matches!(UpdateResult::Idle.merge(UpdateResult::Idle), UpdateResult::Idle));
    }
}
