use async_trait::async_trait;
use sqlx::PgPool;

use super::{RepositoryError, RepositoryResult, UserRepository};
use crate::models::{CreateUserRequest, UpdateUserRequest, User};

const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";

/// `UserRepository` over a shared Postgres pool.
///
/// Holds no locks of its own; isolation is whatever a single statement gets
/// from Postgres.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, req: CreateUserRequest) -> RepositoryResult<User> {
        let sql = format!(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&req.name)
            .bind(&req.email)
            .fetch_one(&self.pool)
            .await
            // An INSERT .. RETURNING always yields a row, so RowNotFound is not a miss here.
            .map_err(RepositoryError::Persistence)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);

        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn update(&self, id: i64, req: UpdateUserRequest) -> RepositoryResult<User> {
        let sql = format!(
            "UPDATE users SET name = $1, email = $2, updated_at = NOW() \
             WHERE id = $3 RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&req.name)
            .bind(&req.email)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
