use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::{Lookup, WordDefinition};

/// Tag of a single [`LookupStateMachine::fetch`] call. The first fetch is `1`.
pub type RequestId = u64;

/// What the presentation layer should currently display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LookupStatus {
    #[default]
    Idle,
    Loading,
    Success(Vec<WordDefinition>),
    Error,
}

impl LookupStatus {
    /// Success and Error are resting states, a new fetch is needed to leave them.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error)
    }
}

/// A status together with the fetch that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// `None` until the first fetch.
    pub request: Option<RequestId>,
    pub status: LookupStatus,
}

impl Snapshot {
    /// True once the completion of `request` is the visible status.
    pub fn is_settled_for(&self, request: RequestId) -> bool {
        self.request == Some(request) && self.status.is_settled()
    }
}

/// Holds the status of the most recent lookup.
///
/// Every write replaces the whole [`Snapshot`]. Overlapping fetches are not
/// ordered: whichever lookup completes last decides the final status, and its
/// [`RequestId`] is recorded next to it.
///
/// Pending lookups are never cancelled. A spawned lookup keeps running, and
/// keeps its connection open, after the state machine that issued it is
/// dropped; its result is then only seen by receivers from [`Self::subscribe`].
pub struct LookupStateMachine {
    lookup: Arc<dyn Lookup>,
    status: Arc<watch::Sender<Snapshot>>,
    last_request: AtomicU64,
}

impl LookupStateMachine {
    pub fn new(lookup: Arc<dyn Lookup>) -> Self {
        let (status, _) = watch::channel(Snapshot::default());
        Self {
            lookup,
            status: Arc::new(status),
            last_request: AtomicU64::new(0),
        }
    }

    /// Switches to Loading right away and resolves `word` in the background.
    ///
    /// # Panics
    /// Panics when called outside of a Tokio runtime.
    pub fn fetch(&self, word: impl Into<String>) -> RequestId {
        let word = word.into();
        let request = self.last_request.fetch_add(1, Ordering::Relaxed) + 1;
        self.status.send_replace(Snapshot {
            request: Some(request),
            status: LookupStatus::Loading,
        });
        tracing::debug!(request, %word, "lookup started");

        let lookup = Arc::clone(&self.lookup);
        let status = Arc::clone(&self.status);
        tokio::spawn(async move {
            let next = match lookup.lookup(&word).await {
                Ok(words) => {
                    tracing::debug!(request, %word, entries = words.len(), "lookup succeeded");
                    LookupStatus::Success(words)
                }
                Err(error) => {
                    tracing::warn!(request, %word, ?error, "lookup failed");
                    LookupStatus::Error
                }
            };
            status.send_replace(Snapshot {
                request: Some(request),
                status: next,
            });
        });
        request
    }

    pub fn status(&self) -> LookupStatus {
        self.status.borrow().status.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.status.borrow().clone()
    }

    /// Observes every status change from now on.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.status.subscribe()
    }
}
