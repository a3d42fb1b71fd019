//! Remote entity services.
//!
//! The form controllers only see these traits. The record store behind them
//! is external; [`SandboxBackend`] is an in-process implementation that lets
//! the application run on its own.

mod sandbox;

use async_trait::async_trait;
use thiserror::Error;

use crate::form::EntitySchema;

pub use sandbox::SandboxBackend;

/// Text used when a failure arrives without a usable message.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unknown error occurred";

/// A rejected remote call.
///
/// The server may or may not attach a human-readable message. Display always
/// yields non-empty text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", display_message(.message.as_deref()))]
pub struct RemoteError {
    message: Option<String>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// A failure that carried no message body.
    pub const fn without_message() -> Self {
        Self { message: None }
    }

    /// The server's message, or the fallback text when it is missing or blank.
    pub fn message(&self) -> &str {
        display_message(self.message.as_deref())
    }
}

fn display_message(message: Option<&str>) -> &str {
    match message {
        Some(m) if !m.trim().is_empty() => m,
        _ => FALLBACK_ERROR_MESSAGE,
    }
}

/// List and create operations for one entity type.
#[async_trait]
pub trait EntityService<S: EntitySchema>: Send + Sync {
    /// Fetch all records, ordered as the server returns them.
    async fn list(&self) -> Result<Vec<S::Record>, RemoteError>;

    /// Persist a new record. The server assigns its identity.
    async fn create(&self, payload: S::Payload) -> Result<S::Record, RemoteError>;
}

/// Request/response greeting endpoint.
#[async_trait]
pub trait GreetingService: Send + Sync {
    async fn echo(&self, name: &str) -> Result<String, RemoteError>;
}
