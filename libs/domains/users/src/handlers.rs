use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_helpers::{ErrorResponse, JsonObject};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    CreatedResponse, MessageResponse, NewUser, USER_CREATED, USER_DELETED, USER_UPDATED,
    UserResponse, UsersResponse,
};
use crate::repository::UserStore;
use crate::service::UserService;

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(add_user, get_user, get_users, update_user, delete_user),
    components(schemas(
        NewUser,
        CreatedResponse,
        MessageResponse,
        UserResponse,
        UsersResponse,
        ErrorResponse
    )),
    tags(
        (name = "Users", description = "User record endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<S: UserStore + 'static>(service: UserService<S>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/add_user", post(add_user))
        .route("/get_user/{id}", get(get_user))
        .route("/get_users", get(get_users))
        .route("/update_user/{id}", put(update_user))
        .route("/delete_user/{id}", delete(delete_user))
        .with_state(shared_service)
}

/// Create a user
///
/// The password is stored as an Argon2 hash. Fields other than `name`,
/// `email`, `age` and `password` are stored as supplied.
#[utoipa::path(
    post,
    path = "/add_user",
    tag = "Users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = CreatedResponse),
        (status = 400, description = "Field errors keyed by field name", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
async fn add_user<S: UserStore>(
    State(service): State<Arc<UserService<S>>>,
    JsonObject(body): JsonObject,
) -> UserResult<impl IntoResponse> {
    let user_id = service.create_user(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: USER_CREATED.to_string(),
            user_id,
        }),
    ))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/get_user/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
async fn get_user<S: UserStore>(
    State(service): State<Arc<UserService<S>>>,
    Path(id): Path<String>,
) -> UserResult<Json<UserResponse>> {
    let message = service.get_user(&id).await?;
    Ok(Json(UserResponse { message }))
}

/// List every user
#[utoipa::path(
    get,
    path = "/get_users",
    tag = "Users",
    responses(
        (status = 200, description = "All users in store order", body = UsersResponse),
        (status = 404, description = "No users stored", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
async fn get_users<S: UserStore>(
    State(service): State<Arc<UserService<S>>>,
) -> UserResult<Json<UsersResponse>> {
    let message = service.list_users().await?;
    Ok(Json(UsersResponse { message }))
}

/// Set fields on a user
#[utoipa::path(
    put,
    path = "/update_user/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User id (24 hex characters)")
    ),
    request_body(content = NewUser, description = "Any subset of fields to set; other fields are allowed"),
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "Body is not a JSON object, or fails strict checks", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
async fn update_user<S: UserStore>(
    State(service): State<Arc<UserService<S>>>,
    Path(id): Path<String>,
    JsonObject(body): JsonObject,
) -> UserResult<Json<MessageResponse>> {
    service.update_user(&id, body).await?;
    Ok(Json(MessageResponse::new(USER_UPDATED)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/delete_user/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
async fn delete_user<S: UserStore>(
    State(service): State<Arc<UserService<S>>>,
    Path(id): Path<String>,
) -> UserResult<Json<MessageResponse>> {
    service.delete_user(&id).await?;
    Ok(Json(MessageResponse::new(USER_DELETED)))
}
