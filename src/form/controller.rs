//! The list-and-create form controller.
//!
//! A submission is split in two phases so the event loop can run the remote
//! call as a spawned command:
//!
//! 1. [`FormController::begin_submit`] gates on the draft and the in-flight
//!    flag and returns the typed payload.
//! 2. [`FormController::complete_submit`] applies the outcome. On success the
//!    draft is reset and exactly one list refresh is requested.
//!
//! [`FormController::submit`] runs both phases around a direct `create` call.

use std::marker::PhantomData;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::form::{Draft, EntitySchema, ListCache, RefreshRequest, StatusMessage};
use crate::remote::{EntityService, RemoteError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{entity} form has no field named '{field}'")]
    UnknownField { entity: &'static str, field: String },
}

/// Reasons a submission never reached the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    /// A required field is empty.
    #[error("required fields are missing")]
    Incomplete,
    /// An earlier submission has not completed yet.
    #[error("a submission is already in flight")]
    InFlight,
    /// A typed field could not be coerced; the status message explains why.
    #[error("the draft could not be converted into a payload")]
    InvalidDraft,
}

pub struct FormController<S: EntitySchema> {
    draft: Draft,
    status: StatusMessage,
    cache: ListCache<S::Record>,
    in_flight: bool,
    _schema: PhantomData<S>,
}

impl<S: EntitySchema> FormController<S> {
    /// Create a controller with an empty draft.
    ///
    /// The initial list query is issued here; the returned request must be
    /// fetched and applied by the caller.
    pub fn new() -> (Self, RefreshRequest) {
        let mut cache = ListCache::new();
        let initial = cache.request_refresh();
        let controller = Self {
            draft: Draft::new(S::fields()),
            status: StatusMessage::default(),
            cache,
            in_flight: false,
            _schema: PhantomData,
        };
        (controller, initial)
    }

    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    pub const fn status(&self) -> &StatusMessage {
        &self.status
    }

    pub const fn cache(&self) -> &ListCache<S::Record> {
        &self.cache
    }

    pub const fn cache_mut(&mut self) -> &mut ListCache<S::Record> {
        &mut self.cache
    }

    pub const fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Write a raw value into the draft. No validation happens here.
    ///
    /// # Errors
    /// Returns [`FormError::UnknownField`] if the entity has no such field.
    pub fn update_field(&mut self, field: &str, raw_value: impl Into<String>) -> Result<(), FormError> {
        if self.draft.set(field, raw_value) {
            Ok(())
        } else {
            Err(FormError::UnknownField {
                entity: S::ENTITY,
                field: field.to_string(),
            })
        }
    }

    /// True iff every required field holds a non-empty value.
    pub fn can_submit(&self) -> bool {
        self.draft.is_complete()
    }

    /// Validate the draft and mark a submission as in flight.
    ///
    /// # Errors
    /// Returns [`SubmitRejected`] without contacting the service when the
    /// draft is incomplete, a submission is outstanding, or a typed field
    /// fails to parse. Only the last case sets an error status.
    pub fn begin_submit(&mut self) -> Result<S::Payload, SubmitRejected> {
        if self.in_flight {
            debug!(entity = S::ENTITY, "Submit ignored, previous one still in flight");
            return Err(SubmitRejected::InFlight);
        }
        if !self.can_submit() {
            debug!(entity = S::ENTITY, "Submit ignored, required fields missing");
            return Err(SubmitRejected::Incomplete);
        }

        match S::build_payload(&self.draft) {
            Ok(payload) => {
                self.in_flight = true;
                Ok(payload)
            }
            Err(e) => {
                self.status = StatusMessage::error(S::failure_text(&e.to_string()));
                Err(SubmitRejected::InvalidDraft)
            }
        }
    }

    /// Apply the outcome of the `create` call started by
    /// [`begin_submit`](Self::begin_submit).
    ///
    /// Returns the list refresh to run after a success.
    pub fn complete_submit(
        &mut self,
        outcome: Result<S::Record, RemoteError>,
    ) -> Option<RefreshRequest> {
        if !self.in_flight {
            warn!(entity = S::ENTITY, "Submit outcome arrived with no submission in flight");
        }
        self.in_flight = false;

        match outcome {
            Ok(record) => {
                info!(entity = S::ENTITY, ?record, "Record created");
                self.status = StatusMessage::success(S::success_text());
                self.draft.reset();
                Some(self.cache.request_refresh())
            }
            Err(e) => {
                warn!(entity = S::ENTITY, error = %e, "Create failed");
                self.status = StatusMessage::error(S::failure_text(e.message()));
                None
            }
        }
    }

    /// Submit the draft and wait for `create` to resolve.
    ///
    /// The refresh requested on success is returned unfetched; the
    /// controller's state has already settled.
    ///
    /// # Errors
    /// See [`begin_submit`](Self::begin_submit).
    pub async fn submit<F>(&mut self, service: &F) -> Result<Option<RefreshRequest>, SubmitRejected>
    where
        F: EntityService<S> + ?Sized,
    {
        let payload = self.begin_submit()?;
        let outcome = service.create(payload).await;
        Ok(self.complete_submit(outcome))
    }
}
