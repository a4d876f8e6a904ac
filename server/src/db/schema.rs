use sqlx::SqlitePool;

use crate::error::AppError;

/// Idempotent schema bootstrap: the four tables plus their foreign-key
/// indexes, created at startup if absent, followed by the default user.
pub async fn bootstrap(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          username TEXT NOT NULL UNIQUE,
          display_name TEXT NOT NULL,
          created_at TEXT NOT NULL DEFAULT (datetime('now','utc'))
        );

        CREATE TABLE IF NOT EXISTS chat_sessions (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
          title TEXT,
          created_at TEXT NOT NULL DEFAULT (datetime('now','utc')),
          updated_at TEXT NOT NULL DEFAULT (datetime('now','utc'))
        );

        CREATE TABLE IF NOT EXISTS chat_messages (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          session_id INTEGER NOT NULL REFERENCES chat_sessions(id) ON DELETE CASCADE,
          role TEXT NOT NULL,
          content TEXT NOT NULL,
          created_at TEXT NOT NULL DEFAULT (datetime('now','utc'))
        );

        CREATE TABLE IF NOT EXISTS writing_entries (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
          title TEXT NOT NULL,
          input_text TEXT NOT NULL,
          grammar_result TEXT,
          paraphrase_result TEXT,
          ai_check_result TEXT,
          humanizer_result TEXT,
          is_favorite INTEGER NOT NULL DEFAULT 0,
          created_at TEXT NOT NULL DEFAULT (datetime('now','utc')),
          updated_at TEXT NOT NULL DEFAULT (datetime('now','utc'))
        );

        CREATE INDEX IF NOT EXISTS idx_chat_sessions_user ON chat_sessions(user_id);
        CREATE INDEX IF NOT EXISTS idx_chat_messages_session ON chat_messages(session_id);
        CREATE INDEX IF NOT EXISTS idx_writing_entries_user ON writing_entries(user_id);
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO users (username, display_name) VALUES ('default', 'Default User')")
        .execute(pool)
        .await?;

    Ok(())
}
