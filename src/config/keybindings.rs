use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub suspend: KeyBinding,
    pub next_tab: KeyBinding,
    pub prev_tab: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormKeybindings {
    pub next_field: KeyBinding,
    pub prev_field: KeyBinding,
    pub next_option: KeyBinding,
    pub prev_option: KeyBinding,
    pub submit: KeyBinding,
    pub reload: KeyBinding,
    pub scroll_up: KeyBinding,
    pub scroll_down: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeybindingsConfig {
    #[serde(default)]
    pub global: GlobalKeybindings,
    #[serde(default)]
    pub form: FormKeybindings,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: vec![Key::ctrl('c'), Key::ctrl('q')].into(),
            suspend: Key::ctrl('z').into(),
            next_tab: vec![Key::ctrl('n'), Key::new(KeyCode::F(2))].into(),
            prev_tab: vec![Key::ctrl('p'), Key::new(KeyCode::F(1))].into(),
        }
    }
}

impl Default for FormKeybindings {
    fn default() -> Self {
        Self {
            next_field: vec![Key::new(KeyCode::Tab), Key::new(KeyCode::Down)].into(),
            prev_field: vec![Key::new(KeyCode::BackTab), Key::new(KeyCode::Up)].into(),
            next_option: Key::new(KeyCode::Right).into(),
            prev_option: Key::new(KeyCode::Left).into(),
            submit: Key::new(KeyCode::Enter).into(),
            reload: Key::ctrl('r').into(),
            scroll_up: Key::new(KeyCode::PageUp).into(),
            scroll_down: Key::new(KeyCode::PageDown).into(),
        }
    }
}
