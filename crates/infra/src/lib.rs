mod config;
mod repos;
mod system;

pub use config::Config;
pub use repos::{
    CreateReply, IEventStore, InMemoryEventStore, MongoEventStore, Repos, StoreError,
};
use std::sync::Arc;
pub use system::{ISys, RealSys};

const TESTING_ENV: &str = "TESTING";

/// Everything the rest of the application needs from the infrastructure
/// layer: the selected store implementation, the resolved configuration and
/// the clock. Constructed once at process start and passed around
/// explicitly.
#[derive(Clone)]
pub struct EventlyContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl EventlyContext {
    async fn create(config: Config) -> Self {
        let sys: Arc<dyn ISys> = Arc::new(RealSys {});
        let repos =
            Repos::create_mongodb(&config.connection_string, &config.database_name, sys.clone())
                .await
                .expect("Mongodb connection string must point at a reachable server");
        Self { repos, config, sys }
    }

    pub fn create_inmemory() -> Self {
        Self::create_inmemory_with_sys(Arc::new(RealSys {}))
    }

    /// In-memory context with an injected clock, for tests that pin the
    /// current date.
    pub fn create_inmemory_with_sys(sys: Arc<dyn ISys>) -> Self {
        Self {
            repos: Repos::create_inmemory(sys.clone()),
            config: Config::new(),
            sys,
        }
    }
}

/// Will setup the infrastructure context given the environment. When the
/// `TESTING` flag is set the in-memory store is used, otherwise the remote
/// document database is connected.
pub async fn setup_context() -> EventlyContext {
    let testing = std::env::var(TESTING_ENV)
        .map(|v| !v.is_empty())
        .unwrap_or(false);
    if testing {
        return EventlyContext::create_inmemory();
    }
    EventlyContext::create(Config::new()).await
}
