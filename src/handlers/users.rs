//! `/users` CRUD handlers.
//!
//! Each handler parses its input, makes exactly one repository call bounded by
//! the request deadline, and maps the outcome to a response. Failures go through `AppError`, which does the
//! logging for error paths; successful mutations log here.

use std::future::Future;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;

use crate::models::{CreateUserRequest, UpdateUserRequest};
use crate::repository::{RepositoryError, RepositoryResult};
use crate::state::AppState;
use crate::utils::error::{AppError, INVALID_USER_ID};
use crate::utils::response::{created, no_content, ok};

type HandlerResult = Result<Response, AppError>;

fn user_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::ValidationError(INVALID_USER_ID.to_string()))
}

/// Runs a repository call, abandoning it once the request deadline passes.
async fn within_deadline<T, F>(state: &AppState, call: F) -> RepositoryResult<T>
where
    F: Future<Output = RepositoryResult<T>>,
{
    tokio::time::timeout(state.request_timeout, call)
        .await
        .unwrap_or_else(|_| Err(RepositoryError::DeadlineExceeded(state.request_timeout)))
}

fn valid_body(
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<CreateUserRequest, AppError> {
    let Json(req) = body?;
    req.validate()
        .map_err(|msg| AppError::ValidationError(msg.to_string()))?;
    Ok(req)
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> HandlerResult {
    let req = valid_body(body)?;

    let user = within_deadline(&state, state.users.create(req))
        .await
        .map_err(|e| AppError::from_repository(e, "Failed to create user"))?;

    tracing::info!(user_id = user.id, email = %user.email, "User created");
    Ok(created(user))
}

pub async fn list_users(State(state): State<AppState>) -> HandlerResult {
    let users = within_deadline(&state, state.users.list())
        .await
        .map_err(|e| AppError::from_repository(e, "Failed to list users"))?;

    Ok(ok(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> HandlerResult {
    let id = user_id(path)?;

    let user = within_deadline(&state, state.users.get_by_id(id))
        .await
        .map_err(|e| AppError::from_repository(e, "Failed to get user"))?;

    Ok(ok(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> HandlerResult {
    let id = user_id(path)?;
    let req = valid_body(body)?;

    let user = within_deadline(&state, state.users.update(id, req))
        .await
        .map_err(|e| AppError::from_repository(e, "Failed to update user"))?;

    tracing::info!(user_id = user.id, "User updated");
    Ok(ok(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> HandlerResult {
    let id = user_id(path)?;

    within_deadline(&state, state.users.delete(id))
        .await
        .map_err(|e| AppError::from_repository(e, "Failed to delete user"))?;

    tracing::info!(user_id = id, "User deleted");
    Ok(no_content())
}
