//! Persistence for the `users` table.
//!
//! Every operation is a single statement against the store of record. The
//! returned futures are the cancellation boundary: dropping one (client gone,
//! request deadline hit) abandons the statement without producing a result.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CreateUserRequest, UpdateUserRequest, User};

mod postgres;

pub use postgres::PgUserRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("user not found")]
    NotFound,

    #[error("persistence error: {0}")]
    Persistence(#[source] sqlx::Error),

    /// The call was abandoned after running past the request deadline.
    #[error("storage call exceeded its {0:?} deadline")]
    DeadlineExceeded(Duration),
}

impl RepositoryError {
    /// True when the store rejected a write on the unique `email` constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            RepositoryError::Persistence(sqlx::Error::Database(db_err)) => {
                db_err.is_unique_violation()
            }
            _ => false,
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            other => RepositoryError::Persistence(other),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, req: CreateUserRequest) -> RepositoryResult<User>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<User>;

    /// All users in insertion order. Empty when the table is empty.
    async fn list(&self) -> RepositoryResult<Vec<User>>;

    /// Overwrites `name` and `email` and refreshes `updated_at`.
    async fn update(&self, id: i64, req: UpdateUserRequest) -> RepositoryResult<User>;

    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}
