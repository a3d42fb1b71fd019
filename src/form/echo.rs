//! Request/response form: one input, one display line, no list.

use tracing::{debug, warn};

use crate::remote::{GreetingService, RemoteError};

#[derive(Debug, Default)]
pub struct EchoController {
    name: String,
    greeting: String,
    in_flight: bool,
}

impl EchoController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub const fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn update_name(&mut self, raw_value: impl Into<String>) {
        self.name = raw_value.into();
    }

    /// Clear the previous greeting and hand out the name to echo.
    ///
    /// Returns `None` while an earlier echo is still outstanding.
    pub fn begin_echo(&mut self) -> Option<String> {
        if self.in_flight {
            debug!("Echo ignored, previous one still in flight");
            return None;
        }
        self.in_flight = true;
        self.greeting.clear();
        Some(self.name.clone())
    }

    pub fn complete_echo(&mut self, outcome: Result<String, RemoteError>) {
        self.in_flight = false;
        self.greeting = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Echo failed");
                format!("Error: {}", e.message())
            }
        };
    }

    /// Echo the current name and wait for the reply.
    pub async fn submit<G>(&mut self, service: &G)
    where
        G: GreetingService + ?Sized,
    {
        let Some(name) = self.begin_echo() else {
            return;
        };
        let outcome = service.echo(&name).await;
        self.complete_echo(outcome);
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct Scripted(Result<String, RemoteError>);

    #[async_trait]
    impl GreetingService for Scripted {
        async fn echo(&self, _name: &str) -> Result<String, RemoteError> {
            self.0.clone()
        }
    }

    #[test]
    fn update_name_keeps_raw_value() {
        let mut echo = EchoController::new();
        echo.update_name("John Doe");
        assert_eq!(echo.name(), "John Doe");
    }

    #[tokio::test]
    async fn successful_echo_is_displayed_verbatim() {
        let mut echo = EchoController::new();
        echo.update_name("John Doe");

        echo.submit(&Scripted(Ok("Hello, John Doe!".into()))).await;

        assert_eq!(echo.greeting(), "Hello, John Doe!");
        assert!(!echo.is_submitting());
    }

    #[tokio::test]
    async fn rejected_echo_is_prefixed() {
        let mut echo = EchoController::new();
        echo.update_name("John Doe");

        echo.submit(&Scripted(Err(RemoteError::new("Some error")))).await;
        assert_eq!(echo.greeting(), "Error: Some error");

        echo.submit(&Scripted(Err(RemoteError::without_message()))).await;
        assert_eq!(echo.greeting(), "Error: An unknown error occurred");
    }

    #[test]
    fn overlapping_echo_is_rejected() {
        let mut echo = EchoController::new();
        echo.update_name("Ada");
        assert_eq!(echo.begin_echo().as_deref(), Some("Ada"));
        assert_eq!(echo.begin_echo(), None);

        echo.complete_echo(Ok("Hello, Ada!".into()));
        assert_eq!(echo.greeting(), "Hello, Ada!");
        assert!(echo.begin_echo().is_some());
        assert_eq!(echo.greeting(), "");
    }
}
