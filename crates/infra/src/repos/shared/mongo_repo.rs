use anyhow::Result;
use futures::stream::StreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, to_bson, Document},
    options::FindOptions,
    Collection, Cursor,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

/// Mapping between a domain entity and the BSON document the store keeps
/// for it.
pub trait MongoDocument<E>: Serialize + DeserializeOwned {
    fn to_domain(self) -> E;
    fn from_domain(entity: &E) -> Self;
}

fn get_id_filter(oid: &ObjectId) -> Document {
    doc! {
        "_id": oid.clone()
    }
}

fn entity_to_persistence<E, D: MongoDocument<E>>(entity: &E) -> Document {
    let raw = D::from_domain(entity);
    to_bson(&raw).unwrap().as_document().unwrap().to_owned()
}

fn persistence_to_entity<E, D: MongoDocument<E>>(doc: Document) -> E {
    let raw: D = bson::from_document(doc).unwrap();
    raw.to_domain()
}

pub async fn insert<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    entity: &E,
) -> Result<()> {
    let doc = entity_to_persistence::<E, D>(entity);
    collection.insert_one(doc, None).await?;
    Ok(())
}

pub async fn find<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    oid: &ObjectId,
) -> Result<Option<E>> {
    find_one_by::<E, D>(collection, get_id_filter(oid)).await
}

pub async fn find_one_by<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<Option<E>> {
    let doc = collection.find_one(filter, None).await?;
    Ok(doc.map(persistence_to_entity::<E, D>))
}

pub async fn find_many_by<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    filter: Document,
    options: Option<FindOptions>,
) -> Result<Vec<E>> {
    let cursor = collection.find(filter, options).await?;
    Ok(consume_cursor::<E, D>(cursor).await)
}

pub async fn delete_by_id(collection: &Collection<Document>, oid: &ObjectId) -> Result<()> {
    collection.delete_one(get_id_filter(oid), None).await?;
    Ok(())
}

async fn consume_cursor<E, D: MongoDocument<E>>(mut cursor: Cursor<Document>) -> Vec<E> {
    let mut documents = vec![];
    while let Some(result) = cursor.next().await {
        match result {
            Ok(document) => {
                documents.push(persistence_to_entity::<E, D>(document));
            }
            Err(e) => {
                error!("Error getting cursor for event store: {:?}", e);
            }
        }
    }

    documents
}
