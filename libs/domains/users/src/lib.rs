//! Users Domain
//!
//! User records kept in MongoDB behind five HTTP endpoints.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, {"message"} / {"error"} envelopes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Schema validation, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  UserStore  │  ← Data access (trait + MongoDB and in-memory implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Field rules, rendering
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::mongodb::{ConnectionProvider, MongoConfig};
//! use domain_users::{MongoUserStore, UserService, handlers};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017/", "userDb");
//! let store = MongoUserStore::new(ConnectionProvider::per_request(config));
//! let router: axum::Router = handlers::router(UserService::new(store));
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod password;
pub mod repository;
pub mod schema;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryUserStore;
pub use models::{NewUser, USERS_COLLECTION, render_user};
pub use mongo::MongoUserStore;
pub use repository::UserStore;
pub use schema::FieldErrors;
pub use service::UserService;
