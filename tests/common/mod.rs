//! Shared fixtures for HTTP tests.
//!
//! `InMemoryUserRepository` mirrors the Postgres repository's contract
//! (sequential ids, unique emails, insertion-ordered listing) so the router
//! can be exercised without a database.

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use chrono::Utc;
use std::sync::Arc;

use users_api::config::Config;
use users_api::models::{CreateUserRequest, UpdateUserRequest, User};
use users_api::repository::{RepositoryError, RepositoryResult, UserRepository};
use users_api::routes::create_routes;
use users_api::state::AppState;

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: Vec<User>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table>,
}

// A Protocol error stands in for the Postgres unique violation; building a real
// `sqlx::Error::Database` needs a driver error, so `is_unique_violation()` is
// false here. The flag itself is covered in the repository unit tests.
fn duplicate_email() -> RepositoryError {
    RepositoryError::Persistence(sqlx::Error::Protocol(
        "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
    ))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, req: CreateUserRequest) -> RepositoryResult<User> {
        let mut table = self.table.lock().unwrap();
        if table.rows.iter().any(|u| u.email == req.email) {
            return Err(duplicate_email());
        }

        table.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: table.next_id,
            name: req.name,
            email: req.email,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<User> {
        let table = self.table.lock().unwrap();
        table
            .rows
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.table.lock().unwrap().rows.clone())
    }

    async fn update(&self, id: i64, req: UpdateUserRequest) -> RepositoryResult<User> {
        let mut table = self.table.lock().unwrap();
        if table.rows.iter().any(|u| u.id != id && u.email == req.email) {
            return Err(duplicate_email());
        }

        let user = table
            .rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;
        user.name = req.name;
        user.email = req.email;
        user.updated_at = Utc::now().max(user.updated_at);
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|u| u.id != id);
        if table.rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Fails every call as if the database were unreachable.
pub struct UnavailableUserRepository;

#[async_trait]
impl UserRepository for UnavailableUserRepository {
    async fn create(&self, _req: CreateUserRequest) -> RepositoryResult<User> {
        Err(RepositoryError::Persistence(sqlx::Error::PoolTimedOut))
    }

    async fn get_by_id(&self, _id: i64) -> RepositoryResult<User> {
        Err(RepositoryError::Persistence(sqlx::Error::PoolTimedOut))
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        Err(RepositoryError::Persistence(sqlx::Error::PoolTimedOut))
    }

    async fn update(&self, _id: i64, _req: UpdateUserRequest) -> RepositoryResult<User> {
        Err(RepositoryError::Persistence(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: i64) -> RepositoryResult<()> {
        Err(RepositoryError::Persistence(sqlx::Error::PoolTimedOut))
    }
}

/// Never finishes a call within any reasonable request deadline.
pub struct SlowUserRepository {
    pub delay: Duration,
}

impl SlowUserRepository {
    async fn stall<T: Send>(&self) -> RepositoryResult<T> {
        tokio::time::sleep(self.delay).await;
        Err(RepositoryError::NotFound)
    }
}

#[async_trait]
impl UserRepository for SlowUserRepository {
    async fn create(&self, _req: CreateUserRequest) -> RepositoryResult<User> {
        self.stall().await
    }

    async fn get_by_id(&self, _id: i64) -> RepositoryResult<User> {
        self.stall().await
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        self.stall().await
    }

    async fn update(&self, _id: i64, _req: UpdateUserRequest) -> RepositoryResult<User> {
        self.stall().await
    }

    async fn delete(&self, _id: i64) -> RepositoryResult<()> {
        self.stall().await
    }
}

pub fn create_test_app() -> Router {
    app_with(Arc::new(InMemoryUserRepository::default()))
}

pub fn app_with(repo: Arc<dyn UserRepository>) -> Router {
    app_with_timeout(repo, Config::default().request_timeout)
}

pub fn app_with_timeout(repo: Arc<dyn UserRepository>, request_timeout: Duration) -> Router {
    create_routes(AppState::new(repo, request_timeout), &Config::default())
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
