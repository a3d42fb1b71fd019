pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::path::PathBuf;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::load;
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// Settings for the bundled sandbox backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Simulated round-trip time of every remote call.
    pub latency_ms: u64,
    /// JSON file the records are kept in. In-memory only when unset.
    pub data_file: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            latency_ms: 300,
            data_file: loader::data_dir().map(|dir| dir.join("records.json")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::config::key::{Key, KeyBinding};

    #[test]
    fn empty_file_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.theme.name, "Catppuccin Mocha");
        assert_eq!(config.backend.latency_ms, 300);
        assert_eq!(config.keybindings.form.submit, KeyBinding::from(Key::new(KeyCode::Enter)));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [backend]
            latency_ms = 0

            [keybindings.form]
            reload = "F5"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.latency_ms, 0);
        assert_eq!(config.keybindings.form.reload, KeyBinding::Single(Key::new(KeyCode::F(5))));
        assert_eq!(config.keybindings.form.submit, KeyBinding::from(Key::new(KeyCode::Enter)));
        assert_eq!(config.keybindings.global.suspend, KeyBinding::from(Key::ctrl('z')));
    }
}
