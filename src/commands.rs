//! Async commands for side effects.
//!
//! Screens never await remote calls themselves. They return commands from
//! `update()`, the App spawns them, and each command reports back through
//! the screen's own message channel. The App only learns that the command
//! finished and whether it failed.

mod greeting;
mod record;

use async_trait::async_trait;
use color_eyre::Result;

pub use greeting::EchoCmd;
pub use record::{CreateRecordCmd, FetchListCmd};

/// Async side effect spawned by the App.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for the status bar and logs.
    fn name(&self) -> String;

    /// Run the command. Domain failures go to the screen's channel; an `Err`
    /// here means the command itself could not complete.
    async fn execute(self: Box<Self>) -> Result<()>;
}
