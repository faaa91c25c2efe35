//! Shared application state passed to route builders.

use database::mongodb::ConnectionProvider;

/// Cloned into each route group; the provider clone shares the shared-mode client.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    pub provider: ConnectionProvider,
}
