//! Commands for list-and-create forms.

use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use tokio::sync::mpsc::UnboundedSender;

use crate::commands::Command;
use crate::form::{EntitySchema, RefreshRequest};
use crate::remote::EntityService;
use crate::screen::EntityMsg;

/// Send a new record to the service.
pub struct CreateRecordCmd<S: EntitySchema> {
    service: Arc<dyn EntityService<S>>,
    payload: S::Payload,
    tx: UnboundedSender<EntityMsg<S::Record>>,
}

impl<S: EntitySchema> CreateRecordCmd<S> {
    pub fn new(
        service: Arc<dyn EntityService<S>>,
        payload: S::Payload,
        tx: UnboundedSender<EntityMsg<S::Record>>,
    ) -> Self {
        Self { service, payload, tx }
    }
}

#[async_trait]
impl<S: EntitySchema> Command for CreateRecordCmd<S> {
    fn name(&self) -> String {
        format!("Adding {}", S::ENTITY.to_lowercase())
    }

    async fn execute(self: Box<Self>) -> Result<()> {
        let outcome = self.service.create(self.payload).await;
        self.tx
            .send(EntityMsg::Created(outcome))
            .map_err(|_| eyre!("{} form closed before the record was added", S::ENTITY))
    }
}

/// Run one list query and deliver it under its ticket.
pub struct FetchListCmd<S: EntitySchema> {
    service: Arc<dyn EntityService<S>>,
    request: RefreshRequest,
    tx: UnboundedSender<EntityMsg<S::Record>>,
}

impl<S: EntitySchema> FetchListCmd<S> {
    pub fn new(
        service: Arc<dyn EntityService<S>>,
        request: RefreshRequest,
        tx: UnboundedSender<EntityMsg<S::Record>>,
    ) -> Self {
        Self { service, request, tx }
    }
}

#[async_trait]
impl<S: EntitySchema> Command for FetchListCmd<S> {
    fn name(&self) -> String {
        format!("Loading {} #{}", S::PLURAL.to_lowercase(), self.request.ticket())
    }

    async fn execute(self: Box<Self>) -> Result<()> {
        let refreshed = self.request.fetch::<S, _>(self.service.as_ref()).await;
        self.tx
            .send(EntityMsg::ListLoaded(refreshed))
            .map_err(|_| eyre!("{} form closed before the list arrived", S::ENTITY))
    }
}
