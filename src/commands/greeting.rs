use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use tokio::sync::mpsc::UnboundedSender;

use crate::commands::Command;
use crate::remote::GreetingService;
use crate::screen::GreetingMsg;

/// Ask the greeting endpoint to echo a name.
pub struct EchoCmd {
    service: Arc<dyn GreetingService>,
    name: String,
    tx: UnboundedSender<GreetingMsg>,
}

impl EchoCmd {
    pub fn new(service: Arc<dyn GreetingService>, name: String, tx: UnboundedSender<GreetingMsg>) -> Self {
        Self { service, name, tx }
    }
}

#[async_trait]
impl Command for EchoCmd {
    fn name(&self) -> String {
        format!("Greeting '{}'", self.name)
    }

    async fn execute(self: Box<Self>) -> Result<()> {
        let outcome = self.service.echo(&self.name).await;
        self.tx
            .send(GreetingMsg::Replied(outcome))
            .map_err(|_| eyre!("greeting form closed before the reply arrived"))
    }
}
