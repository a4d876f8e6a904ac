use sqlx::SqlitePool;

use crate::db::models::User;
use crate::error::AppError;

#[derive(Clone)]
pub struct UserRepo {
    read_pool: SqlitePool,
    write_pool: SqlitePool,
}

impl UserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            read_pool: pool.clone(),
            write_pool: pool,
        }
    }

    pub fn with_pools(read_pool: SqlitePool, write_pool: SqlitePool) -> Self {
        Self {
            read_pool,
            write_pool,
        }
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.read_pool)
            .await?;
        Ok(row)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.read_pool)
            .await?;
        Ok(row)
    }

    pub async fn get_or_create_default_user(&self) -> Result<User, AppError> {
        if let Some(user) = self.get_user_by_username("default").await? {
            return Ok(user);
        }

        sqlx::query("INSERT INTO users (username, display_name) VALUES ('default', 'Default User')")
            .execute(&self.write_pool)
            .await?;

        self.get_user_by_username("default")
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "user".to_string(),
                id: "default".to_string(),
            })
    }

    /// Resolves an optional userId from a request body to a concrete user,
    /// falling back to the default user.
    pub async fn resolve_user(&self, user_id: Option<i64>) -> Result<User, AppError> {
        match user_id {
            Some(id) => self.get_user(id).await?.ok_or_else(|| AppError::NotFound {
                entity: "user".to_string(),
                id: id.to_string(),
            }),
            None => self.get_or_create_default_user().await,
        }
    }
}
