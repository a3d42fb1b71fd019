use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{FormAction, GlobalAction};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to configured actions.
pub struct KeyResolver {
    keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Suspend => &kb.suspend,
            GlobalAction::NextTab => &kb.next_tab,
            GlobalAction::PrevTab => &kb.prev_tab,
        }
    }

    fn form(&self, action: FormAction) -> &KeyBinding {
        let kb = &self.keybindings.form;
        match action {
            FormAction::NextField => &kb.next_field,
            FormAction::PrevField => &kb.prev_field,
            FormAction::NextOption => &kb.next_option,
            FormAction::PrevOption => &kb.prev_option,
            FormAction::Submit => &kb.submit,
            FormAction::Reload => &kb.reload,
            FormAction::ScrollUp => &kb.scroll_up,
            FormAction::ScrollDown => &kb.scroll_down,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    pub fn matches_form(&self, event: &KeyEvent, action: FormAction) -> bool {
        self.form(action).matches(event)
    }

    pub fn display_form(&self, action: FormAction) -> String {
        self.form(action).display()
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}
