use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_flag, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Every user record lives in this database, whatever the connection string says
pub const USER_DATABASE: &str = "userDb";

/// Behaviour switches for the users endpoints
#[derive(Clone, Debug, Default)]
pub struct UsersConfig {
    /// Validate update bodies against the field rules (`USERS_STRICT_UPDATES`)
    pub strict_updates: bool,
}

impl FromEnv for UsersConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            strict_updates: env_flag("USERS_STRICT_UPDATES", false)?,
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub users: UsersConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();

        let mut mongodb = MongoConfig::from_env()?.in_database(USER_DATABASE);
        if mongodb.app_name.is_none() {
            mongodb = mongodb.with_app_name(app.name);
        }

        Ok(Self {
            app,
            mongodb,
            server: ServerConfig::from_env()?,
            users: UsersConfig::from_env()?,
            environment,
        })
    }
}
