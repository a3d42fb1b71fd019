use chrono::{DateTime, Utc};
use ratatui::layout::Constraint;
use ratatui::widgets::Cell;
use serde::{Deserialize, Serialize};

use crate::Theme;
use crate::form::{Draft, EntitySchema, FieldDef, FieldKind, PayloadError};
use crate::ui::{ColumnDef, TableRow};

/// A contact as stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
}

pub struct ContactSchema;

static CONTACT_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", "Name", FieldKind::Text).with_placeholder("Jane Doe"),
    FieldDef::optional("email", "Email", FieldKind::Text).with_placeholder("jane@example.com"),
    FieldDef::optional("phone", "Phone", FieldKind::Text),
];

impl EntitySchema for ContactSchema {
    type Record = Contact;
    type Payload = ContactPayload;

    const ENTITY: &'static str = "Contact";
    const PLURAL: &'static str = "Contacts";

    fn fields() -> &'static [FieldDef] {
        CONTACT_FIELDS
    }

    fn build_payload(draft: &Draft) -> Result<ContactPayload, PayloadError> {
        Ok(ContactPayload {
            name: draft.value("name").to_string(),
            email: draft.value("email").to_string(),
            phone: draft.value("phone").to_string(),
        })
    }
}

impl TableRow for Contact {
    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("Name", Constraint::Min(16)),
            ColumnDef::new("Email", Constraint::Min(20)),
            ColumnDef::new("Phone", Constraint::Length(16)),
        ];
        COLUMNS
    }

    fn render_cells(&self, _theme: &Theme) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.name.clone()),
            Cell::from(or_dash(&self.email)),
            Cell::from(or_dash(&self.phone)),
        ]
    }
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "—".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_name_is_required() {
        let required: Vec<_> = ContactSchema::fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(required, ["name"]);
    }

    #[test]
    fn payload_copies_text_fields() {
        let mut draft = Draft::new(ContactSchema::fields());
        draft.set("name", "Jane");
        draft.set("phone", "+41 79 000 00 00");

        let payload = ContactSchema::build_payload(&draft).unwrap();
        assert_eq!(
            payload,
            ContactPayload {
                name: "Jane".into(),
                email: String::new(),
                phone: "+41 79 000 00 00".into(),
            }
        );
    }

    #[test]
    fn outcome_texts() {
        assert_eq!(ContactSchema::success_text(), "Contact added successfully!");
        assert_eq!(
            ContactSchema::failure_text("Duplicate email"),
            "Error adding contact: Duplicate email"
        );
    }
}
