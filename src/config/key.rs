use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single key chord, written in config files as e.g. `"ctrl+r"` or `"Tab"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub const fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        // Shift is implied by uppercase chars and by BackTab, terminals differ
        // in whether they report it.
        let implied_shift = match event.code {
            KeyCode::Char(c) => c.is_ascii_uppercase(),
            KeyCode::BackTab => true,
            _ => false,
        };
        let ignore = if implied_shift { KeyModifiers::SHIFT } else { KeyModifiers::NONE };

        self.code == event.code && (self.modifiers - ignore) == (event.modifiers - ignore)
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("shift".to_string());
        }
        parts.push(match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(n) => format!("F{n}"),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            code => format!("{code:?}"),
        });
        parts.join("+")
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (mods, key_part) = match s.rsplit_once('+') {
            // "+" on its own, or "ctrl++"
            Some((mods, "")) => (mods.strip_suffix('+').unwrap_or(mods), "+"),
            Some((mods, key)) => (mods, key),
            None => ("", s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in mods.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return Err(format!("Unknown modifier: {part}")),
            };
        }

        let lower = key_part.to_lowercase();
        let code = match lower.as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" if modifiers.contains(KeyModifiers::SHIFT) => {
                modifiers -= KeyModifiers::SHIFT;
                KeyCode::BackTab
            }
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "space" => KeyCode::Char(' '),
            f if f.len() > 1 && f.starts_with('f') => {
                let n = f[1..]
                    .parse()
                    .map_err(|_| format!("Invalid function key: {key_part}"))?;
                KeyCode::F(n)
            }
            _ => {
                let mut chars = key_part.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(format!("Unknown key: {key_part}")),
                }
            }
        };

        Ok(Self { code, modifiers })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One or more keys bound to the same action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyBinding {
    Single(Key),
    Multiple(Vec<Key>),
}

impl KeyBinding {
    pub fn keys(&self) -> &[Key] {
        match self {
            Self::Single(key) => std::slice::from_ref(key),
            Self::Multiple(keys) => keys,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys().iter().any(|k| k.matches(event))
    }

    pub fn display(&self) -> String {
        self.keys().iter().map(Key::display).collect::<Vec<_>>().join("/")
    }
}

impl From<Key> for KeyBinding {
    fn from(key: Key) -> Self {
        Self::Single(key)
    }
}

impl From<Vec<Key>> for KeyBinding {
    fn from(keys: Vec<Key>) -> Self {
        Self::Multiple(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_modified_keys() {
        assert_eq!("Enter".parse::<Key>().unwrap(), Key::new(KeyCode::Enter));
        assert_eq!("ctrl+r".parse::<Key>().unwrap(), Key::ctrl('r'));
        assert_eq!("F2".parse::<Key>().unwrap(), Key::new(KeyCode::F(2)));
        assert_eq!("shift+tab".parse::<Key>().unwrap(), Key::new(KeyCode::BackTab));
        assert_eq!("+".parse::<Key>().unwrap(), Key::new(KeyCode::Char('+')));
        assert!("hyper+x".parse::<Key>().is_err());
        assert!("nope".parse::<Key>().is_err());
    }

    #[test]
    fn display_matches_config_syntax() {
        assert_eq!(Key::ctrl('n').display(), "ctrl+n");
        assert_eq!(Key::new(KeyCode::Tab).display(), "Tab");
        assert_eq!(Key::new(KeyCode::F(3)).display(), "F3");
    }

    #[test]
    fn backtab_matches_with_or_without_shift() {
        let key = Key::new(KeyCode::BackTab);
        assert!(key.matches(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)));
        assert!(key.matches(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE)));
    }

    #[test]
    fn ctrl_binding_does_not_match_plain_char() {
        let key = Key::ctrl('r');
        assert!(key.matches(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert!(!key.matches(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE)));
    }

    #[test]
    fn binding_deserializes_from_string_or_list() {
        #[derive(Deserialize)]
        struct Wrapper {
            one: KeyBinding,
            many: KeyBinding,
        }

        let parsed: Wrapper = toml::from_str("one = \"ctrl+q\"\nmany = [\"Tab\", \"Down\"]").unwrap();
        assert_eq!(parsed.one, KeyBinding::Single(Key::ctrl('q')));
        assert_eq!(
            parsed.many.keys(),
            [Key::new(KeyCode::Tab), Key::new(KeyCode::Down)]
        );
    }
}
