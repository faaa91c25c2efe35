use mongodb::{Client, Database};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    ConnectionMode, HealthStatus, MongoConfig, MongoError, check_health_detailed,
    connect_from_config_with_retry, open_client,
};
use crate::common::RetryConfig;

/// Hands out database handles to units of request work.
///
/// In per-request mode every call to [`ConnectionProvider::scoped`] gets its
/// own client, which is shut down once the work finishes, whatever the
/// outcome. In shared mode all work runs on one pooled client.
#[derive(Clone, Debug)]
pub enum ConnectionProvider {
    PerRequest(Arc<MongoConfig>),
    Shared { client: Client, database: Database },
}

impl ConnectionProvider {
    pub fn per_request(config: MongoConfig) -> Self {
        Self::PerRequest(Arc::new(config))
    }

    pub fn shared(client: Client, database: &str) -> Self {
        let database = client.database(database);
        Self::Shared { client, database }
    }

    /// Build the provider selected by `config.mode`.
    ///
    /// Shared mode connects eagerly (with retries) so startup fails fast when
    /// the server is unreachable. Per-request mode never contacts the server here.
    pub async fn from_config(
        config: MongoConfig,
        retry: Option<RetryConfig>,
    ) -> Result<Self, MongoError> {
        match config.mode {
            ConnectionMode::PerRequest => {
                info!(database = %config.database, "Using a dedicated MongoDB client per request");
                Ok(Self::per_request(config))
            }
            ConnectionMode::Shared => {
                let client = connect_from_config_with_retry(&config, retry).await?;
                info!(database = %config.database, "Using a shared MongoDB client");
                Ok(Self::shared(client, &config.database))
            }
        }
    }

    pub fn mode(&self) -> ConnectionMode {
        match self {
            Self::PerRequest(_) => ConnectionMode::PerRequest,
            Self::Shared { .. } => ConnectionMode::Shared,
        }
    }

    pub fn database_name(&self) -> &str {
        match self {
            Self::PerRequest(config) => &config.database,
            Self::Shared { database, .. } => database.name(),
        }
    }

    /// Run `work` against a database handle.
    ///
    /// A per-request client is released before this returns, on success and
    /// on failure alike.
    pub async fn scoped<T, E, F, Fut>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(Database) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<MongoError>,
    {
        match self {
            Self::Shared { database, .. } => work(database.clone()).await,
            Self::PerRequest(config) => {
                let client = open_client(config).await.map_err(E::from)?;
                let result = work(client.database(&config.database)).await;
                client.shutdown().await;
                debug!("Released per-request MongoDB client");
                result
            }
        }
    }

    pub async fn check_health(&self) -> HealthStatus {
        match self {
            Self::Shared { database, .. } => check_health_detailed(database).await,
            Self::PerRequest(config) => match open_client(config).await {
                Ok(client) => {
                    let status = check_health_detailed(&client.database(&config.database)).await;
                    client.shutdown().await;
                    status
                }
                Err(e) => HealthStatus::unhealthy(e.to_string(), 0),
            },
        }
    }

    /// Shut down the shared client, if any
    pub async fn close(self) {
        if let Self::Shared { client, .. } = self {
            info!("Closing shared MongoDB client");
            client.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{Document, doc};
    use test_utils::{TestDataBuilder, TestMongo};

    #[test]
    fn test_per_request_provider_reports_mode_and_database() {
        let provider =
            ConnectionProvider::per_request(MongoConfig::default().in_database("userDb"));
        assert_eq!(provider.mode(), ConnectionMode::PerRequest);
        assert_eq!(provider.database_name(), "userDb");
    }

    #[tokio::test]
    async fn test_from_config_per_request_does_not_connect() {
        let config = MongoConfig::new("mongodb://127.0.0.1:1/").in_database("userDb");
        let provider = ConnectionProvider::from_config(config, None).await.unwrap();
        assert_eq!(provider.mode(), ConnectionMode::PerRequest);
    }

    #[tokio::test]
    async fn test_scoped_surfaces_malformed_url() {
        let provider = ConnectionProvider::per_request(MongoConfig::new("not-a-url"));
        let result: Result<(), MongoError> = provider.scoped(|_db| async { Ok(()) }).await;
        assert!(matches!(result, Err(MongoError::Mongo(_))));
    }

    #[tokio::test]
    async fn test_scoped_per_request_round_trip() {
        let mongo = TestMongo::new().await;
        let builder = TestDataBuilder::from_test_name("test_scoped_per_request_round_trip");
        let provider = ConnectionProvider::per_request(
            MongoConfig::new(mongo.connection_string()).in_database(builder.database_name()),
        );

        provider
            .scoped(|db| async move {
                db.collection::<Document>("users")
                    .insert_one(doc! { "name": "Ada" })
                    .await
                    .map_err(MongoError::from)
            })
            .await
            .unwrap();

        let count = provider
            .scoped(|db| async move {
                db.collection::<Document>("users")
                    .count_documents(doc! {})
                    .await
                    .map_err(MongoError::from)
            })
            .await
            .unwrap();
        assert_eq!(count, 1);

        assert!(provider.check_health().await.healthy);
    }

    #[tokio::test]
    async fn test_scoped_releases_client_after_failed_work() {
        let mongo = TestMongo::new().await;
        let provider = ConnectionProvider::per_request(
            MongoConfig::new(mongo.connection_string()).in_database("scoped_failure"),
        );

        let result: Result<(), MongoError> = provider
            .scoped(|_db| async { Err(MongoError::ConnectionFailed("work failed".into())) })
            .await;
        assert!(matches!(result, Err(MongoError::ConnectionFailed(_))));

        // A fresh client is still available for the next unit of work.
        assert!(provider.check_health().await.healthy);
    }

    #[tokio::test]
    async fn test_shared_provider_close() {
        let mongo = TestMongo::new().await;
        let provider = ConnectionProvider::shared(mongo.client(), "shared_close");
        assert_eq!(provider.mode(), ConnectionMode::Shared);
        assert!(provider.check_health().await.healthy);
        provider.close().await;
    }
}
