use std::fmt;

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    None,
    Success,
    Error,
}

/// Transient outcome text shown under a form.
///
/// Each outcome overwrites the previous message; there is no history.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusMessage {
    text: String,
    severity: Severity,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_empty(&self) -> bool {
        self.severity == Severity::None
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
