mod event;
mod shared;

use crate::system::ISys;
pub use event::{CreateReply, IEventStore, InMemoryEventStore, MongoEventStore, StoreError};
use mongodb::{options::ClientOptions, Client};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub event_store: Arc<dyn IEventStore>,
}

impl Repos {
    pub async fn create_mongodb(
        connection_string: &str,
        db_name: &str,
        sys: Arc<dyn ISys>,
    ) -> anyhow::Result<Self> {
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // This is needed to make sure that db is ready when opening server
        info!("DB CHECKING CONNECTION ...");
        db.collection("server-start")
            .insert_one(
                mongodb::bson::doc! {
                    "server-start": 1
                },
                None,
            )
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            event_store: Arc::new(MongoEventStore::new(&db, sys)),
        })
    }

    pub fn create_inmemory(sys: Arc<dyn ISys>) -> Self {
        Self {
            event_store: Arc::new(InMemoryEventStore::new(sys)),
        }
    }
}
