use sqlx::SqlitePool;

use crate::db::models::{ChatMessage, ChatSession};
use crate::error::AppError;

#[derive(Clone)]
pub struct ChatRepo {
    read_pool: SqlitePool,
    write_pool: SqlitePool,
}

impl ChatRepo {
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

    pub async fn create_session(
        &self,
        user_id: i64,
        title: Option<&str>,
    ) -> Result<ChatSession, AppError> {
        let result = sqlx::query("INSERT INTO chat_sessions (user_id, title) VALUES (?1, ?2)")
            .bind(user_id)
            .bind(title)
            .execute(&self.write_pool)
            .await?;

        let id = result.last_insert_rowid();
        self.get_session(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "chat_session".to_string(),
                id: id.to_string(),
            })
    }

    pub async fn get_session(&self, id: i64) -> Result<Option<ChatSession>, AppError> {
        let row = sqlx::query_as::<_, ChatSession>("SELECT * FROM chat_sessions WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.read_pool)
            .await?;
        Ok(row)
    }

    pub async fn list_sessions(&self, user_id: i64) -> Result<Vec<ChatSession>, AppError> {
        let rows = sqlx::query_as::<_, ChatSession>(
            r#"
            SELECT * FROM chat_sessions
            WHERE user_id = ?1
            ORDER BY datetime(updated_at) DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.read_pool)
        .await?;
        Ok(rows)
    }

    /// Appends a message and bumps the session's updated_at. Sessions created
    /// untitled take their title from the first user message.
    pub async fn insert_message(
        &self,
        session_id: i64,
        role: &str,
        content: &str,
    ) -> Result<ChatMessage, AppError> {
        let session = self
            .get_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "chat_session".to_string(),
                id: session_id.to_string(),
            })?;

        let result =
            sqlx::query("INSERT INTO chat_messages (session_id, role, content) VALUES (?1, ?2, ?3)")
                .bind(session_id)
                .bind(role)
                .bind(content)
                .execute(&self.write_pool)
                .await?;
        let id = result.last_insert_rowid();

        sqlx::query("UPDATE chat_sessions SET updated_at = datetime('now','utc') WHERE id = ?1")
            .bind(session_id)
            .execute(&self.write_pool)
            .await?;

        if session.title.as_deref().map_or(true, str::is_empty) && role == "user" {
            let title = auto_title(content);
            sqlx::query("UPDATE chat_sessions SET title = ?1 WHERE id = ?2 AND (title IS NULL OR title = '')")
                .bind(&title)
                .bind(session_id)
                .execute(&self.write_pool)
                .await?;
        }

        self.get_message(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "chat_message".to_string(),
                id: id.to_string(),
            })
    }

    pub async fn get_message(&self, id: i64) -> Result<Option<ChatMessage>, AppError> {
        let row = sqlx::query_as::<_, ChatMessage>("SELECT * FROM chat_messages WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.read_pool)
            .await?;
        Ok(row)
    }

    /// Messages in insertion order. Autoincrement id is the reliable ordering;
    /// the text timestamps only have 1-second resolution.
    pub async fn list_messages(&self, session_id: i64) -> Result<Vec<ChatMessage>, AppError> {
        let rows = sqlx::query_as::<_, ChatMessage>(
            "SELECT * FROM chat_messages WHERE session_id = ?1 ORDER BY id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.read_pool)
        .await?;
        Ok(rows)
    }

    /// Cascade delete: messages first, then the session row.
    pub async fn delete_session(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM chat_messages WHERE session_id = ?1")
            .bind(id)
            .execute(&self.write_pool)
            .await?;

        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?1")
            .bind(id)
            .execute(&self.write_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                entity: "chat_session".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn auto_title(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= 60 {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(57).collect();
        format!("{}...", cut.trim_end())
    }
}
