//! MongoDB connection management
//!
//! Configuration, connection with retry, health probing and the
//! [`ConnectionProvider`] that scopes handles to request work.

mod config;
mod connector;
mod health;
mod provider;

pub use config::{ConnectionMode, DEFAULT_MONGODB_URL, MongoConfig};
pub use connector::{MongoError, connect_from_config, connect_from_config_with_retry, open_client};
pub use health::{HealthStatus, check_health_detailed};
pub use provider::ConnectionProvider;

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database, bson};
