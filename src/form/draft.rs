use crate::form::FieldDef;

/// In-memory, not yet submitted form values.
///
/// Values are kept exactly as typed; coercion happens only when a payload is
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    fields: &'static [FieldDef],
    values: Vec<String>,
}

impl Draft {
    pub fn new(fields: &'static [FieldDef]) -> Self {
        Self {
            fields,
            values: vec![String::new(); fields.len()],
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|i| self.values[i].as_str())
    }

    /// Value of a field known to exist in the schema. Unknown names read as
    /// empty.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Returns `false` when `name` is not part of this draft.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.index_of(name) {
            Some(i) => {
                self.values[i] = value.into();
                true
            }
            None => false,
        }
    }

    /// Names of required fields that are still empty, in schema order.
    pub fn missing_required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .zip(&self.values)
            .filter(|(def, value)| def.required && value.is_empty())
            .map(|(def, _)| def.name)
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().next().is_none()
    }

    pub fn is_pristine(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    pub fn reset(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldKind;

    static FIELDS: &[FieldDef] = &[
        FieldDef::required("name", "Name", FieldKind::Text),
        FieldDef::optional("note", "Note", FieldKind::Text),
        FieldDef::required("amount", "Amount", FieldKind::Decimal),
    ];

    #[test]
    fn set_keeps_raw_text() {
        let mut draft = Draft::new(FIELDS);
        for (name, value) in [("name", "  Jane "), ("note", "ünïcode"), ("amount", "12.50")] {
            assert!(draft.set(name, value));
            assert_eq!(draft.get(name), Some(value));
        }
    }

    #[test]
    fn unknown_field_is_not_written() {
        let mut draft = Draft::new(FIELDS);
        assert!(!draft.set("email", "x"));
        assert_eq!(draft.get("email"), None);
        assert!(draft.is_pristine());
    }

    #[test]
    fn missing_required_lists_empty_required_fields() {
        let mut draft = Draft::new(FIELDS);
        assert_eq!(draft.missing_required().collect::<Vec<_>>(), ["name", "amount"]);

        draft.set("name", "Lunch");
        assert_eq!(draft.missing_required().collect::<Vec<_>>(), ["amount"]);
        assert!(!draft.is_complete());

        draft.set("amount", "3");
        assert!(draft.is_complete());
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut draft = Draft::new(FIELDS);
        draft.set("name", "Lunch");
        draft.set("note", "team");
        draft.reset();
        assert_eq!(draft, Draft::new(FIELDS));
    }
}
