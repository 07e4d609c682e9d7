use super::{CreateReply, IEventStore, StoreError};
use crate::repos::shared::inmemory_repo::{all, delete, find, find_by, insert, update_one};
use crate::system::ISys;
use anyhow::anyhow;
use evently_domain::{EventDraft, EventPatch, ReactionKind, TrackedEvent, ID};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the remote store, used in test contexts. Satisfies
/// the same contract, with the collection lock standing in for the remote
/// store's atomic update primitives.
pub struct InMemoryEventStore {
    events: Mutex<Vec<TrackedEvent>>,
    sys: Arc<dyn ISys>,
}

impl InMemoryEventStore {
    pub fn new(sys: Arc<dyn ISys>) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            sys,
        }
    }
}

#[async_trait::async_trait]
impl IEventStore for InMemoryEventStore {
    async fn list_all(&self) -> Result<Vec<TrackedEvent>, StoreError> {
        let mut events = all(&self.events);
        events.sort_by(|a, b| b.sort_date.cmp(&a.sort_date));
        Ok(events)
    }

    async fn create(
        &self,
        draft: EventDraft,
        return_all: bool,
    ) -> Result<CreateReply, StoreError> {
        let event = TrackedEvent::from_draft(draft, self.sys.local_date())
            .map_err(|e| StoreError::new("create", e))?;
        insert(&event, &self.events);
        if return_all {
            let events = self
                .list_all()
                .await
                .map_err(|e| StoreError::new("create.list_all", e))?;
            Ok(CreateReply::All(events))
        } else {
            Ok(CreateReply::Created(event))
        }
    }

    async fn get_by_id(&self, event_id: &str) -> Result<Option<TrackedEvent>, StoreError> {
        let id = match ID::from_str(event_id) {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };
        Ok(find(&id, &self.events))
    }

    async fn get_by_title(&self, title: &str) -> Result<Vec<TrackedEvent>, StoreError> {
        Ok(find_by(&self.events, |event| event.title == title))
    }

    async fn update(
        &self,
        event_id: &str,
        patch: EventPatch,
        return_all: bool,
    ) -> Result<Vec<TrackedEvent>, StoreError> {
        let id = ID::from_str(event_id).map_err(|e| StoreError::new("update", e))?;
        match update_one(&id, &self.events, |event| event.apply_patch(patch)) {
            Some(applied) => applied.map_err(|e| StoreError::new("update", e))?,
            None => {
                return Err(StoreError::new(
                    "update",
                    anyhow!("no event with id {}", event_id),
                ))
            }
        }
        if return_all {
            self.list_all()
                .await
                .map_err(|e| StoreError::new("update", e))
        } else {
            Ok(Vec::new())
        }
    }

    async fn delete(&self, event_id: &str) -> Result<(), StoreError> {
        if let Ok(id) = ID::from_str(event_id) {
            delete(&id, &self.events);
        }
        Ok(())
    }

    async fn change_reaction(
        &self,
        event_id: &str,
        kind: &str,
        increment: bool,
    ) -> Result<Vec<TrackedEvent>, StoreError> {
        let kind = match ReactionKind::parse(kind) {
            Some(kind) => kind,
            None => {
                return self
                    .list_all()
                    .await
                    .map_err(|e| StoreError::new("change_reaction", e))
            }
        };
        let id = ID::from_str(event_id).map_err(|e| StoreError::new("change_reaction", e))?;
        update_one(&id, &self.events, |event| {
            event.apply_reaction(kind, increment)
        })
        .ok_or_else(|| {
            StoreError::new("change_reaction", anyhow!("no event with id {}", event_id))
        })?;
        self.list_all()
            .await
            .map_err(|e| StoreError::new("change_reaction", e))
    }
}
