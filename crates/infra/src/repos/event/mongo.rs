use super::{CreateReply, IEventStore, StoreError};
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use crate::system::ISys;
use anyhow::anyhow;
use evently_domain::{
    normalize, strip_reserved, EventDraft, EventPatch, InvalidDateError, ReactionKind,
    TrackedEvent, ID,
};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::FindOptions,
    Collection, Database,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Store backed by the remote document database. One collection, one
/// document per event.
pub struct MongoEventStore {
    collection: Collection<Document>,
    sys: Arc<dyn ISys>,
}

impl MongoEventStore {
    pub fn new(db: &Database, sys: Arc<dyn ISys>) -> Self {
        Self {
            collection: db.collection("events"),
            sys,
        }
    }

    /// The sorted full read used both by `list_all` itself and by the
    /// operations that re-list after a write. `op` names the operation the
    /// failure should be attributed to.
    async fn list_all_as(&self, op: &'static str) -> Result<Vec<TrackedEvent>, StoreError> {
        let options = FindOptions::builder()
            .sort(doc! { "sortDate": -1 })
            .build();
        mongo_repo::find_many_by::<_, TrackedEventMongo>(&self.collection, doc! {}, Some(options))
            .await
            .map_err(|e| StoreError::new(op, e))
    }
}

#[async_trait::async_trait]
impl IEventStore for MongoEventStore {
    async fn list_all(&self) -> Result<Vec<TrackedEvent>, StoreError> {
        self.list_all_as("list_all").await
    }

    async fn create(
        &self,
        draft: EventDraft,
        return_all: bool,
    ) -> Result<CreateReply, StoreError> {
        let event = TrackedEvent::from_draft(draft, self.sys.local_date())
            .map_err(|e| StoreError::new("create", e))?;
        mongo_repo::insert::<_, TrackedEventMongo>(&self.collection, &event)
            .await
            .map_err(|e| StoreError::new("create", e))?;
        if return_all {
            Ok(CreateReply::All(self.list_all_as("create.list_all").await?))
        } else {
            Ok(CreateReply::Created(event))
        }
    }

    async fn get_by_id(&self, event_id: &str) -> Result<Option<TrackedEvent>, StoreError> {
        let id = match ID::from_str(event_id) {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };
        mongo_repo::find::<_, TrackedEventMongo>(&self.collection, id.inner_ref())
            .await
            .map_err(|e| StoreError::new("get_by_id", e))
    }

    async fn get_by_title(&self, title: &str) -> Result<Vec<TrackedEvent>, StoreError> {
        let filter = doc! { "title": title };
        mongo_repo::find_many_by::<_, TrackedEventMongo>(&self.collection, filter, None)
            .await
            .map_err(|e| StoreError::new("get_by_title", e))
    }

    async fn update(
        &self,
        event_id: &str,
        patch: EventPatch,
        return_all: bool,
    ) -> Result<Vec<TrackedEvent>, StoreError> {
        let id = ID::from_str(event_id).map_err(|e| StoreError::new("update", e))?;
        let set = patch_to_set_document(patch).map_err(|e| StoreError::new("update", e))?;
        if set.is_empty() {
            // nothing to write, but the contract still requires the target
            // to exist
            let existing =
                mongo_repo::find::<_, TrackedEventMongo>(&self.collection, id.inner_ref())
                    .await
                    .map_err(|e| StoreError::new("update", e))?;
            if existing.is_none() {
                return Err(StoreError::new(
                    "update",
                    anyhow!("no event with id {}", event_id),
                ));
            }
        } else {
            let res = self
                .collection
                .update_one(
                    doc! { "_id": id.inner_ref().clone() },
                    doc! { "$set": set },
                    None,
                )
                .await
                .map_err(|e| StoreError::new("update", e))?;
            if res.matched_count == 0 {
                return Err(StoreError::new(
                    "update",
                    anyhow!("no event with id {}", event_id),
                ));
            }
        }
        if return_all {
            self.list_all_as("update").await
        } else {
            Ok(Vec::new())
        }
    }

    async fn delete(&self, event_id: &str) -> Result<(), StoreError> {
        let id = match ID::from_str(event_id) {
            // nothing can be stored under an id the store could not have
            // minted
            Ok(id) => id,
            Err(_) => return Ok(()),
        };
        mongo_repo::delete_by_id(&self.collection, id.inner_ref())
            .await
            .map_err(|e| StoreError::new("delete", e))
    }

    async fn change_reaction(
        &self,
        event_id: &str,
        kind: &str,
        increment: bool,
    ) -> Result<Vec<TrackedEvent>, StoreError> {
        let kind = match ReactionKind::parse(kind) {
            Some(kind) => kind,
            None => return self.list_all_as("change_reaction").await,
        };
        let id = ID::from_str(event_id).map_err(|e| StoreError::new("change_reaction", e))?;
        let delta: i64 = if increment { 1 } else { -1 };
        // $inc both creates a missing counter and adjusts it in a single
        // round-trip, so concurrent reactions cannot lose updates.
        let mut counters = Document::new();
        counters.insert(kind.field(), delta);
        let res = self
            .collection
            .update_one(
                doc! { "_id": id.inner_ref().clone() },
                doc! { "$inc": counters },
                None,
            )
            .await
            .map_err(|e| StoreError::new("change_reaction", e))?;
        if res.matched_count == 0 {
            return Err(StoreError::new(
                "change_reaction",
                anyhow!("no event with id {}", event_id),
            ));
        }
        self.list_all_as("change_reaction").await
    }
}

fn patch_to_set_document(patch: EventPatch) -> Result<Document, InvalidDateError> {
    let mut set = Document::new();
    if let Some(title) = patch.title {
        set.insert("title", title);
    }
    if let Some(raw) = patch.date {
        let normalized = normalize(&raw)?;
        set.insert("date", normalized.date);
        set.insert("sortDate", normalized.sort_date);
    }
    for (key, value) in strip_reserved(patch.extra) {
        set.insert(key, value);
    }
    Ok(set)
}

#[derive(Debug, Serialize, Deserialize)]
struct TrackedEventMongo {
    _id: ObjectId,
    title: String,
    date: String,
    #[serde(rename = "sortDate")]
    sort_date: String,
    // documents written before the counters existed have neither field
    #[serde(default)]
    likes: i64,
    #[serde(default)]
    dislikes: i64,
    #[serde(flatten)]
    extra: Document,
}

impl MongoDocument<TrackedEvent> for TrackedEventMongo {
    fn to_domain(self) -> TrackedEvent {
        TrackedEvent {
            id: ID::from(self._id),
            title: self.title,
            date: self.date,
            sort_date: self.sort_date,
            likes: self.likes,
            dislikes: self.dislikes,
            extra: self.extra,
        }
    }

    fn from_domain(event: &TrackedEvent) -> Self {
        Self {
            _id: event.id.inner_ref().clone(),
            title: event.title.clone(),
            date: event.date.clone(),
            sort_date: event.sort_date.clone(),
            likes: event.likes,
            dislikes: event.dislikes,
            extra: event.extra.clone(),
        }
    }
}
