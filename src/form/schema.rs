//! Field schemas describing what a form collects for one entity type.

use std::fmt;

use thiserror::Error;

use crate::form::Draft;

/// How a field's raw text is interpreted when the payload is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, sent as-is.
    Text,
    /// Decimal number typed as text, parsed at submission.
    Decimal,
    /// Calendar date typed as `YYYY-MM-DD`.
    Date,
    /// One of a fixed set of options.
    Choice(&'static [&'static str]),
}

/// A single input of an entity form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<&'static str>,
}

impl FieldDef {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            placeholder: None,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            placeholder: None,
        }
    }

    pub const fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

/// A draft value that is present but cannot be coerced into its typed form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("{label} must be a number")]
    InvalidNumber { label: &'static str },

    #[error("{label} must be one of: {}", .options.join(", "))]
    InvalidChoice {
        label: &'static str,
        options: &'static [&'static str],
    },
}

/// Describes one record type handled by a list-and-create form.
///
/// Implementors are zero-sized markers; the controller is generic over them.
pub trait EntitySchema: Send + Sync + 'static {
    /// A persisted record as returned by the service.
    type Record: Clone + fmt::Debug + Send + Sync + 'static;

    /// The typed fields sent to `create`.
    type Payload: Clone + fmt::Debug + Send + 'static;

    /// Capitalized singular name, e.g. `"Contact"`.
    const ENTITY: &'static str;

    /// Plural title used for list headings, e.g. `"Contacts"`.
    const PLURAL: &'static str;

    fn fields() -> &'static [FieldDef];

    /// Coerce the draft into a payload. Only called once every required field
    /// is non-empty.
    ///
    /// # Errors
    /// Returns a [`PayloadError`] when a typed field cannot be parsed.
    fn build_payload(draft: &Draft) -> Result<Self::Payload, PayloadError>;

    fn success_text() -> String {
        format!("{} added successfully!", Self::ENTITY)
    }

    fn failure_text(reason: &str) -> String {
        format!("Error adding {}: {reason}", Self::ENTITY.to_lowercase())
    }
}
