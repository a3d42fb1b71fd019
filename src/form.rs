//! Generic list-and-create form logic, independent of any rendering.
//!
//! - [`FormController`] - draft, validation gate, create, reset, refresh
//! - [`ListCache`] - ticketed handle on the latest list query result
//! - [`EchoController`] - the request/response variant without a list
//! - [`EntitySchema`] - per-entity field table and payload coercion

mod cache;
mod controller;
mod draft;
mod echo;
mod schema;
mod status;

pub use cache::{CacheState, ListCache, RefreshRequest, Refreshed};
pub use controller::FormController;
pub use draft::Draft;
pub use echo::EchoController;
pub use schema::{EntitySchema, FieldDef, FieldKind, PayloadError};
pub use status::{Severity, StatusMessage};
