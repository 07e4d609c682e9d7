use tracing::info;

/// Connection settings for the remote document store, resolved from the
/// environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub connection_string: String,
    pub database_name: String,
}

impl Config {
    pub fn new() -> Self {
        let connection_string = match std::env::var("MONGODB_CONNECTION_STRING") {
            Ok(connection_string) => connection_string,
            Err(_) => {
                let default_connection_string = "mongodb://localhost:27017";
                info!(
                    "Did not find MONGODB_CONNECTION_STRING environment variable. Falling back to: {}",
                    default_connection_string
                );
                default_connection_string.into()
            }
        };
        let database_name = match std::env::var("MONGODB_DATABASE") {
            Ok(database_name) => database_name,
            Err(_) => {
                let default_database_name = "evently";
                info!(
                    "Did not find MONGODB_DATABASE environment variable. Falling back to: {}",
                    default_database_name
                );
                default_database_name.into()
            }
        };
        Self {
            connection_string,
            database_name,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
