//! Record types handled by the forms.

mod contact;
mod expense;

pub use contact::{Contact, ContactPayload, ContactSchema};
pub use expense::{Category, Expense, ExpensePayload, ExpenseSchema};
