use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::db::models::{UpdateWritingEntry, WritingEntry};
use crate::error::AppError;

#[derive(Clone)]
pub struct WritingRepo {
    read_pool: SqlitePool,
    write_pool: SqlitePool,
}

impl WritingRepo {
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

    pub async fn create_entry(
        &self,
        user_id: i64,
        title: &str,
        input_text: &str,
    ) -> Result<WritingEntry, AppError> {
        let result = sqlx::query(
            "INSERT INTO writing_entries (user_id, title, input_text) VALUES (?1, ?2, ?3)",
        )
        .bind(user_id)
        .bind(title)
        .bind(input_text)
        .execute(&self.write_pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_entry(id).await?.ok_or_else(|| AppError::NotFound {
            entity: "writing_entry".to_string(),
            id: id.to_string(),
        })
    }

    pub async fn get_entry(&self, id: i64) -> Result<Option<WritingEntry>, AppError> {
        let row = sqlx::query_as::<_, WritingEntry>("SELECT * FROM writing_entries WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.read_pool)
            .await?;
        Ok(row)
    }

    pub async fn list_entries(&self, user_id: i64) -> Result<Vec<WritingEntry>, AppError> {
        let rows = sqlx::query_as::<_, WritingEntry>(
            r#"
            SELECT * FROM writing_entries
            WHERE user_id = ?1
            ORDER BY datetime(updated_at) DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.read_pool)
        .await?;
        Ok(rows)
    }

    /// Partial update: absent fields keep their stored value. This is the
    /// target of the client's debounced autosave.
    pub async fn update_entry(
        &self,
        id: i64,
        update: UpdateWritingEntry,
    ) -> Result<WritingEntry, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE writing_entries SET
              title = COALESCE(?1, title),
              input_text = COALESCE(?2, input_text),
              grammar_result = COALESCE(?3, grammar_result),
              paraphrase_result = COALESCE(?4, paraphrase_result),
              ai_check_result = COALESCE(?5, ai_check_result),
              humanizer_result = COALESCE(?6, humanizer_result),
              is_favorite = COALESCE(?7, is_favorite),
              updated_at = datetime('now','utc')
            WHERE id = ?8
            "#,
        )
        .bind(update.title)
        .bind(update.input_text)
        .bind(update.grammar_result.map(Json))
        .bind(update.paraphrase_result.map(Json))
        .bind(update.ai_check_result.map(Json))
        .bind(update.humanizer_result.map(Json))
        .bind(update.is_favorite.map(i64::from))
        .bind(id)
        .execute(&self.write_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                entity: "writing_entry".to_string(),
                id: id.to_string(),
            });
        }

        self.get_entry(id).await?.ok_or_else(|| AppError::NotFound {
            entity: "writing_entry".to_string(),
            id: id.to_string(),
        })
    }

    pub async fn delete_entry(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM writing_entries WHERE id = ?1")
            .bind(id)
            .execute(&self.write_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                entity: "writing_entry".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
