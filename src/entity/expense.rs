use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use ratatui::layout::Constraint;
use ratatui::style::Style;
use ratatui::widgets::Cell;
use serde::{Deserialize, Serialize};

use crate::Theme;
use crate::form::{Draft, EntitySchema, FieldDef, FieldKind, PayloadError};
use crate::ui::{ColumnDef, TableRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Travel,
    Food,
    Supplies,
    Other,
}

impl Category {
    pub const ALL: [Self; 4] = [Self::Travel, Self::Food, Self::Supplies, Self::Other];

    pub const NAMES: &'static [&'static str] = &["Travel", "Food", "Supplies", "Other"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Travel => "Travel",
            Self::Food => "Food",
            Self::Supplies => "Supplies",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(PayloadError::InvalidChoice {
                label: "Category",
                options: Self::NAMES,
            })
    }
}

/// An expense as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: u64,
    pub name: String,
    pub amount: f64,
    pub expense_date: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpensePayload {
    pub name: String,
    pub amount: f64,
    pub expense_date: String,
    pub category: Category,
}

pub struct ExpenseSchema;

static EXPENSE_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", "Name", FieldKind::Text).with_placeholder("Team lunch"),
    FieldDef::required("amount", "Amount", FieldKind::Decimal).with_placeholder("0.00"),
    FieldDef::required("expenseDate", "Date", FieldKind::Date).with_placeholder("YYYY-MM-DD"),
    FieldDef::required("category", "Category", FieldKind::Choice(Category::NAMES)),
];

impl EntitySchema for ExpenseSchema {
    type Record = Expense;
    type Payload = ExpensePayload;

    const ENTITY: &'static str = "Expense";
    const PLURAL: &'static str = "Expenses";

    fn fields() -> &'static [FieldDef] {
        EXPENSE_FIELDS
    }

    fn build_payload(draft: &Draft) -> Result<ExpensePayload, PayloadError> {
        let amount = parse_amount(draft.value("amount"))?;
        let category = draft.value("category").parse()?;
        Ok(ExpensePayload {
            name: draft.value("name").to_string(),
            amount,
            expense_date: draft.value("expenseDate").to_string(),
            category,
        })
    }
}

fn parse_amount(raw: &str) -> Result<f64, PayloadError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or(PayloadError::InvalidNumber { label: "Amount" })
}

impl TableRow for Expense {
    fn columns() -> &'static [ColumnDef] {
        static COLUMNS: &[ColumnDef] = &[
            ColumnDef::new("Name", Constraint::Min(16)),
            ColumnDef::new("Amount", Constraint::Length(12)),
            ColumnDef::new("Date", Constraint::Length(12)),
            ColumnDef::new("Category", Constraint::Length(10)),
        ];
        COLUMNS
    }

    fn render_cells(&self, theme: &Theme) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.name.clone()),
            Cell::from(format!("{:>10.2}", self.amount)).style(Style::default().fg(theme.peach())),
            Cell::from(self.expense_date.clone()),
            Cell::from(self.category.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, amount: &str, date: &str, category: &str) -> Draft {
        let mut draft = Draft::new(ExpenseSchema::fields());
        draft.set("name", name);
        draft.set("amount", amount);
        draft.set("expenseDate", date);
        draft.set("category", category);
        draft
    }

    #[test]
    fn every_field_is_required() {
        assert!(ExpenseSchema::fields().iter().all(|f| f.required));
        assert!(!draft("Lunch", "", "2024-01-01", "Food").is_complete());
    }

    #[test]
    fn payload_parses_amount_and_category() {
        let payload = ExpenseSchema::build_payload(&draft("Lunch", "12.50", "2024-01-01", "Food")).unwrap();
        assert_eq!(
            payload,
            ExpensePayload {
                name: "Lunch".into(),
                amount: 12.5,
                expense_date: "2024-01-01".into(),
                category: Category::Food,
            }
        );
    }

    #[test]
    fn amount_tolerates_surrounding_whitespace() {
        let payload = ExpenseSchema::build_payload(&draft("Taxi", " 40 ", "2024-02-03", "Travel")).unwrap();
        assert!((payload.amount - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_numeric_amount() {
        for amount in ["twelve", "NaN", "inf", "1,5"] {
            let err = ExpenseSchema::build_payload(&draft("Lunch", amount, "2024-01-01", "Food")).unwrap_err();
            assert_eq!(err, PayloadError::InvalidNumber { label: "Amount" }, "amount {amount:?}");
        }
    }

    #[test]
    fn rejects_unknown_category() {
        let err = ExpenseSchema::build_payload(&draft("Lunch", "1", "2024-01-01", "Rent")).unwrap_err();
        assert_eq!(err.to_string(), "Category must be one of: Travel, Food, Supplies, Other");
    }

    #[test]
    fn category_round_trips_through_its_name() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }
}
