//! Client-side handle on the result of a list query.
//!
//! Refreshes are ticketed: every [`ListCache::request_refresh`] call issues a
//! new ticket and only the result carrying the newest ticket is installed.
//! Results of superseded requests are dropped, so a refresh requested after a
//! create always ends up reflecting it regardless of completion order.

use tracing::debug;

use crate::form::EntitySchema;
use crate::remote::{EntityService, RemoteError};

/// The latest fetch outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheState<T> {
    Pending,
    Ready(Vec<T>),
    Errored(String),
}

/// A list fetch that has been requested but not yet run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a refresh request does nothing until it is fetched"]
pub struct RefreshRequest {
    ticket: u64,
}

impl RefreshRequest {
    pub const fn ticket(self) -> u64 {
        self.ticket
    }

    /// Run the list query. The cache is not touched; hand the result to
    /// [`ListCache::apply`].
    pub async fn fetch<S, F>(self, service: &F) -> Refreshed<S::Record>
    where
        S: EntitySchema,
        F: EntityService<S> + ?Sized,
    {
        Refreshed {
            ticket: self.ticket,
            result: service.list().await,
        }
    }
}

/// Outcome of a fetched [`RefreshRequest`].
#[derive(Debug, Clone)]
pub struct Refreshed<T> {
    pub ticket: u64,
    pub result: Result<Vec<T>, RemoteError>,
}

#[derive(Debug)]
pub struct ListCache<T> {
    state: CacheState<T>,
    latest_ticket: u64,
    applied_ticket: u64,
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListCache<T> {
    pub const fn new() -> Self {
        Self {
            state: CacheState::Pending,
            latest_ticket: 0,
            applied_ticket: 0,
        }
    }

    pub const fn current(&self) -> &CacheState<T> {
        &self.state
    }

    /// Records of the last successful fetch, if the cache holds any.
    pub fn records(&self) -> &[T] {
        match &self.state {
            CacheState::Ready(records) => records,
            CacheState::Pending | CacheState::Errored(_) => &[],
        }
    }

    /// True while a requested refresh has not been applied yet.
    pub const fn is_stale(&self) -> bool {
        self.applied_ticket < self.latest_ticket
    }

    /// Number of refreshes requested over the cache's lifetime.
    pub const fn refresh_count(&self) -> u64 {
        self.latest_ticket
    }

    /// Issue a new list query ticket and mark the cache stale.
    pub fn request_refresh(&mut self) -> RefreshRequest {
        self.latest_ticket += 1;
        RefreshRequest {
            ticket: self.latest_ticket,
        }
    }

    /// Install a fetch result. Returns `false` when the result belongs to a
    /// superseded request and was dropped.
    pub fn apply(&mut self, refreshed: Refreshed<T>) -> bool {
        if refreshed.ticket != self.latest_ticket {
            debug!(
                ticket = refreshed.ticket,
                latest = self.latest_ticket,
                "Dropping superseded list result"
            );
            return false;
        }

        self.applied_ticket = refreshed.ticket;
        self.state = match refreshed.result {
            Ok(records) => CacheState::Ready(records),
            Err(e) => CacheState::Errored(e.message().to_string()),
        };
        true
    }

    /// Request, fetch and apply in one step.
    pub async fn refresh<S, F>(&mut self, service: &F)
    where
        S: EntitySchema<Record = T>,
        F: EntityService<S> + ?Sized,
    {
        let refreshed = self.request_refresh().fetch::<S, F>(service).await;
        self.apply(refreshed);
    }
}
