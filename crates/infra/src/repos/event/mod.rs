mod inmemory;
mod mongo;

use evently_domain::{EventDraft, EventPatch, TrackedEvent};
pub use inmemory::InMemoryEventStore;
pub use mongo::MongoEventStore;
use thiserror::Error;

/// Single failure kind for every store operation: the operation that failed
/// plus the underlying transport/query error. Absence of a record is never
/// reported through this type, except by `update` and `change_reaction`
/// which require their target to exist.
#[derive(Debug, Error)]
#[error("{op} - Error: {source}")]
pub struct StoreError {
    pub op: &'static str,
    #[source]
    pub source: anyhow::Error,
}

impl StoreError {
    pub(crate) fn new(op: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self {
            op,
            source: source.into(),
        }
    }
}

/// What `create` hands back, depending on whether the caller asked for the
/// full re-read.
#[derive(Debug)]
pub enum CreateReply {
    /// The newly created event, including its minted id.
    Created(TrackedEvent),
    /// The full `list_all` result, reflecting the new entry in sorted order.
    All(Vec<TrackedEvent>),
}

#[async_trait::async_trait]
pub trait IEventStore: Send + Sync {
    /// All events, newest first by sort date. An empty store yields an empty
    /// vector, not an error.
    async fn list_all(&self) -> Result<Vec<TrackedEvent>, StoreError>;

    /// Persists a new event built from `draft`. A failure of the optional
    /// re-list is wrapped as `create.list_all` so callers can tell it apart
    /// from a failure of the create itself.
    async fn create(
        &self,
        draft: EventDraft,
        return_all: bool,
    ) -> Result<CreateReply, StoreError>;

    /// `None` when no such id exists (including ids the store could never
    /// have minted); callers must check for absence.
    async fn get_by_id(&self, event_id: &str) -> Result<Option<TrackedEvent>, StoreError>;

    /// All events whose title matches exactly, in no particular order.
    async fn get_by_title(&self, title: &str) -> Result<Vec<TrackedEvent>, StoreError>;

    /// Partial merge of `patch` into the stored record. Fails when the
    /// target id does not exist. Returns `list_all` when `return_all`, else
    /// an empty vector.
    async fn update(
        &self,
        event_id: &str,
        patch: EventPatch,
        return_all: bool,
    ) -> Result<Vec<TrackedEvent>, StoreError>;

    /// Removes the record. Succeeds silently when the id does not exist.
    async fn delete(&self, event_id: &str) -> Result<(), StoreError>;

    /// Adjusts one reaction counter by one and returns the current event
    /// list. A `kind` other than `likes`/`dislikes` is a no-op that still
    /// returns the list.
    async fn change_reaction(
        &self,
        event_id: &str,
        kind: &str,
        increment: bool,
    ) -> Result<Vec<TrackedEvent>, StoreError>;

    async fn inc_likes(&self, event_id: &str) -> Result<Vec<TrackedEvent>, StoreError> {
        self.change_reaction(event_id, "likes", true).await
    }

    async fn inc_dislikes(&self, event_id: &str) -> Result<Vec<TrackedEvent>, StoreError> {
        self.change_reaction(event_id, "dislikes", true).await
    }
}
