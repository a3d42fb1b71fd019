//! In-process record store implementing the remote service traits.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::BackendConfig;
use crate::entity::{Contact, ContactPayload, ContactSchema, Expense, ExpensePayload, ExpenseSchema};
use crate::remote::{EntityService, GreetingService, RemoteError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read data file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Data file {path:?} is not valid: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Store {
    next_id: u64,
    contacts: Vec<Contact>,
    expenses: Vec<Expense>,
}

impl Store {
    fn assign_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// A local stand-in for the record backend.
///
/// Every call sleeps for the configured latency before answering so the UI
/// exercises its pending states. When a data file is configured the store is
/// written back after each successful create.
pub struct SandboxBackend {
    store: Mutex<Store>,
    latency: Duration,
    data_file: Option<PathBuf>,
}

impl SandboxBackend {
    /// Open the backend, loading existing records from the data file if one is
    /// configured and present.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the data file exists but cannot be read or
    /// parsed.
    pub fn open(config: &BackendConfig) -> Result<Self, StoreError> {
        let store = match &config.data_file {
            Some(path) => load_store(path)?,
            None => Store::default(),
        };
        Ok(Self {
            store: Mutex::new(store),
            latency: Duration::from_millis(config.latency_ms),
            data_file: config.data_file.clone(),
        })
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, RemoteError> {
        self.store
            .lock()
            .map_err(|_| RemoteError::new("Record store is unavailable"))
    }

    fn persist(&self, store: &Store) -> Result<(), RemoteError> {
        let Some(path) = &self.data_file else {
            return Ok(());
        };
        let data = serde_json::to_string_pretty(store)
            .map_err(|e| RemoteError::new(format!("Failed to encode records: {e}")))?;
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .map_err(|e| RemoteError::new(format!("Failed to save records: {e}")))?;
        }
        fs::write(path, data).map_err(|e| RemoteError::new(format!("Failed to save records: {e}")))?;
        debug!(path = ?path, "Saved records");
        Ok(())
    }

    /// Save the store after a record was pushed onto `records`. On a failed
    /// write the record and its id are taken back out.
    fn commit<T>(&self, store: &mut Store, records: fn(&mut Store) -> &mut Vec<T>) -> Result<(), RemoteError> {
        if let Err(e) = self.persist(store) {
            records(store).pop();
            store.next_id -= 1;
            return Err(e);
        }
        Ok(())
    }
}

fn load_store(path: &Path) -> Result<Store, StoreError> {
    if !path.exists() {
        debug!(path = ?path, "Data file not found, starting empty");
        return Ok(Store::default());
    }
    let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let store: Store = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = ?path,
        contacts = store.contacts.len(),
        expenses = store.expenses.len(),
        "Loaded records"
    );
    Ok(store)
}

/// Newest first.
fn newest_first<T: Clone>(records: &[T]) -> Vec<T> {
    records.iter().rev().cloned().collect()
}

#[async_trait]
impl EntityService<ContactSchema> for SandboxBackend {
    async fn list(&self) -> Result<Vec<Contact>, RemoteError> {
        self.round_trip().await;
        Ok(newest_first(&self.lock()?.contacts))
    }

    async fn create(&self, payload: ContactPayload) -> Result<Contact, RemoteError> {
        self.round_trip().await;

        if payload.name.trim().is_empty() {
            return Err(RemoteError::new("Name is required"));
        }

        let mut store = self.lock()?;
        if !payload.email.is_empty()
            && store
                .contacts
                .iter()
                .any(|c| c.email.eq_ignore_ascii_case(&payload.email))
        {
            return Err(RemoteError::new("Duplicate email"));
        }

        let contact = Contact {
            id: store.assign_id(),
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            created_at: Utc::now(),
        };
        store.contacts.push(contact.clone());
        self.commit(&mut store, |s| &mut s.contacts)?;
        Ok(contact)
    }
}

#[async_trait]
impl EntityService<ExpenseSchema> for SandboxBackend {
    async fn list(&self) -> Result<Vec<Expense>, RemoteError> {
        self.round_trip().await;
        Ok(newest_first(&self.lock()?.expenses))
    }

    async fn create(&self, payload: ExpensePayload) -> Result<Expense, RemoteError> {
        self.round_trip().await;

        if payload.name.trim().is_empty() {
            return Err(RemoteError::new("Name is required"));
        }
        if !payload.amount.is_finite() || payload.amount <= 0.0 {
            return Err(RemoteError::new("Amount must be greater than zero"));
        }
        if NaiveDate::parse_from_str(&payload.expense_date, "%Y-%m-%d").is_err() {
            return Err(RemoteError::new(format!("Invalid date: {}", payload.expense_date)));
        }

        let mut store = self.lock()?;
        let expense = Expense {
            id: store.assign_id(),
            name: payload.name,
            amount: payload.amount,
            expense_date: payload.expense_date,
            category: payload.category,
            created_at: Utc::now(),
        };
        store.expenses.push(expense.clone());
        self.commit(&mut store, |s| &mut s.expenses)?;
        Ok(expense)
    }
}

#[async_trait]
impl GreetingService for SandboxBackend {
    async fn echo(&self, name: &str) -> Result<String, RemoteError> {
        self.round_trip().await;
        if name.trim().is_empty() {
            return Err(RemoteError::new("Name is required"));
        }
        Ok(format!("Hello, {name}!"))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::entity::Category;

    fn backend() -> SandboxBackend {
        SandboxBackend::open(&BackendConfig {
            latency_ms: 0,
            data_file: None,
        })
        .unwrap()
    }

    fn contact(name: &str, email: &str) -> ContactPayload {
        ContactPayload {
            name: name.into(),
            email: email.into(),
            phone: String::new(),
        }
    }

    fn expense(amount: f64, date: &str) -> ExpensePayload {
        ExpensePayload {
            name: "Lunch".into(),
            amount,
            expense_date: date.into(),
            category: Category::Food,
        }
    }

    #[tokio::test]
    async fn created_contacts_are_listed_newest_first() {
        let backend = backend();
        let jane = EntityService::<ContactSchema>::create(&backend, contact("Jane", "j@x.com")).await.unwrap();
        let john = EntityService::<ContactSchema>::create(&backend, contact("John", "")).await.unwrap();
        assert_ne!(jane.id, john.id);

        let listed = EntityService::<ContactSchema>::list(&backend).await.unwrap();
        let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["John", "Jane"]);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let backend = backend();
        EntityService::<ContactSchema>::create(&backend, contact("Jane", "j@x.com")).await.unwrap();
        let err = EntityService::<ContactSchema>::create(&backend, contact("Janet", "J@X.com"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Duplicate email");

        // Blank emails never collide.
        EntityService::<ContactSchema>::create(&backend, contact("A", "")).await.unwrap();
        EntityService::<ContactSchema>::create(&backend, contact("B", "")).await.unwrap();
    }

    #[tokio::test]
    async fn expense_checks_amount_and_date() {
        let backend = backend();
        let err = EntityService::<ExpenseSchema>::create(&backend, expense(0.0, "2024-01-01"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Amount must be greater than zero");

        let err = EntityService::<ExpenseSchema>::create(&backend, expense(12.5, "01/01/2024"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Invalid date: 01/01/2024");

        let created = EntityService::<ExpenseSchema>::create(&backend, expense(12.5, "2024-01-01"))
            .await
            .unwrap();
        assert!((created.amount - 12.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn echo_greets_by_name() {
        let backend = backend();
        assert_eq!(backend.echo("John Doe").await.unwrap(), "Hello, John Doe!");
        assert_eq!(backend.echo("").await.unwrap_err().message(), "Name is required");
    }

    #[tokio::test]
    async fn records_survive_reopening_the_data_file() {
        let temp = TempDir::new().unwrap();
        let config = BackendConfig {
            latency_ms: 0,
            data_file: Some(temp.path().join("nested").join("records.json")),
        };

        let backend = SandboxBackend::open(&config).unwrap();
        EntityService::<ContactSchema>::create(&backend, contact("Jane", "j@x.com")).await.unwrap();
        EntityService::<ExpenseSchema>::create(&backend, expense(3.0, "2024-05-06")).await.unwrap();
        drop(backend);

        let reopened = SandboxBackend::open(&config).unwrap();
        let contacts = EntityService::<ContactSchema>::list(&reopened).await.unwrap();
        let expenses = EntityService::<ExpenseSchema>::list(&reopened).await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(expenses.len(), 1);

        let next = EntityService::<ContactSchema>::create(&reopened, contact("John", "")).await.unwrap();
        assert_eq!(next.id, 3);
    }

    #[tokio::test]
    async fn failed_save_leaves_no_record_behind() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let backend = SandboxBackend::open(&BackendConfig {
            latency_ms: 0,
            data_file: Some(blocker.join("records.json")),
        })
        .unwrap();

        let err = EntityService::<ContactSchema>::create(&backend, contact("Jane", "j@x.com"))
            .await
            .unwrap_err();
        assert!(err.message().starts_with("Failed to save records"));
        assert!(EntityService::<ContactSchema>::list(&backend).await.unwrap().is_empty());

        // Retrying is not mistaken for a duplicate.
        let err = EntityService::<ContactSchema>::create(&backend, contact("Jane", "j@x.com"))
            .await
            .unwrap_err();
        assert_ne!(err.message(), "Duplicate email");

        EntityService::<ExpenseSchema>::create(&backend, expense(3.0, "2024-05-06"))
            .await
            .unwrap_err();
        assert!(EntityService::<ExpenseSchema>::list(&backend).await.unwrap().is_empty());
        assert_eq!(backend.lock().unwrap().next_id, 0);
    }

    #[test]
    fn corrupt_data_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("records.json");
        fs::write(&path, "not json").unwrap();

        let result = SandboxBackend::open(&BackendConfig {
            latency_ms: 0,
            data_file: Some(path),
        });
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }
}
