//! Reusable terminal widgets.
//!
//! Components here know nothing about records or remote calls; screens
//! translate their outputs into form operations.

mod choice_field;
mod spinner;
mod status_bar;
mod table;
mod text_field;
mod toast;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use choice_field::ChoiceField;
pub use spinner::Spinner;
pub use status_bar::StatusBar;
pub use table::{ColumnDef, Table, TableRow};
pub use text_field::{LABEL_WIDTH, TextField};
pub use toast::{Toast, ToastManager};

/// Result of handling an input event.
///
/// - `Ignored` - The handler didn't recognize this input
/// - `Consumed` - The input was handled but produced no event
/// - `Event(E)` - The input was handled and produced an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    Ignored,
    Consumed,
    Event(E),
}

impl<E> EventResult<E> {
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Interactive UI building block.
pub trait Component {
    type Output;

    /// Handle a key event.
    ///
    /// # Errors
    /// Returns an error if handling the key failed.
    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    /// Called on each tick for animations and time-based updates.
    fn handle_tick(&mut self) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

/// A key shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub key: String,
    pub description: String,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}
