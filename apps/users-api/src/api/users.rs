//! Users API routes

use axum::Router;
use domain_users::{MongoUserStore, UserService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let store = MongoUserStore::new(state.provider.clone());

    let service =
        UserService::new(store).with_strict_updates(state.config.users.strict_updates);

    handlers::router(service)
}
