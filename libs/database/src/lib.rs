//! Database library providing the MongoDB connector used by the services in this workspace.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client, configuration, health checks and
//!   the request-scoped [`mongodb::ConnectionProvider`]
//! - `config` - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{ConnectionProvider, MongoConfig, MongoError};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "userDb");
//! let provider = ConnectionProvider::per_request(config);
//!
//! let names = provider
//!     .scoped(|db| async move { Ok::<_, MongoError>(db.list_collection_names().await?) })
//!     .await?;
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{RetryConfig, retry_with_backoff};
