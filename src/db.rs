//! Message store over three SQLite relations. Every operation commits on
//! its own; in particular the user turn and the assistant turn of one chat
//! exchange are two independent writes, so a crash in between leaves a
//! dangling unanswered turn in history.

use std::str::FromStr;

use serde::Serialize;
use sqlx::{
    FromRow, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{AppResult, llm::ChatRole};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT,
    email TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
);

CREATE TABLE IF NOT EXISTS chat_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    role TEXT NOT NULL CHECK (role IN ('user','assistant')),
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
);

CREATE TABLE IF NOT EXISTS contact_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    message TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
);
";

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect_with(options)
        .await?;
    sqlx::raw_sql(SCHEMA).execute(&db_pool).await?;
    Ok(db_pool)
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub user_id: String,
    pub message: String,
    pub created_at: String,
}

pub async fn user_exists(db_pool: &SqlitePool, user_id: &str) -> AppResult<bool> {
    Ok(sqlx::query_as::<_, (i64,)>("SELECT 1 FROM users WHERE id=?")
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?
        .is_some())
}

/// Fails if the id is already present; callers check `user_exists` first.
pub async fn add_user(
    db_pool: &SqlitePool,
    user_id: &str,
    name: Option<&str>,
    email: Option<&str>,
) -> AppResult<User> {
    Ok(sqlx::query_as(
        "INSERT INTO users (id,name,email) VALUES (?,?,?) RETURNING id,name,email,created_at",
    )
    .bind(user_id)
    .bind(name)
    .bind(email)
    .fetch_one(db_pool)
    .await?)
}

/// Partial update: absent fields keep their stored value.
pub async fn update_user(
    db_pool: &SqlitePool,
    user_id: &str,
    name: Option<&str>,
    email: Option<&str>,
) -> AppResult<User> {
    Ok(sqlx::query_as(
        "UPDATE users SET name=COALESCE(?,name), email=COALESCE(?,email) WHERE id=? \
         RETURNING id,name,email,created_at",
    )
    .bind(name)
    .bind(email)
    .bind(user_id)
    .fetch_one(db_pool)
    .await?)
}

pub async fn add_message(
    db_pool: &SqlitePool,
    user_id: &str,
    role: ChatRole,
    content: &str,
) -> AppResult<ChatMessage> {
    Ok(sqlx::query_as(
        "INSERT INTO chat_messages (user_id,role,content) VALUES (?,?,?) \
         RETURNING id,user_id,role,content,created_at",
    )
    .bind(user_id)
    .bind(role)
    .bind(content)
    .fetch_one(db_pool)
    .await?)
}

/// Insertion order; the autoincrement id is finer-grained than the
/// second-resolution timestamps.
pub async fn get_messages(db_pool: &SqlitePool, user_id: &str) -> AppResult<Vec<ChatMessage>> {
    Ok(sqlx::query_as(
        "SELECT id,user_id,role,content,created_at FROM chat_messages WHERE user_id=? ORDER BY id ASC",
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await?)
}

/// Deletes the user's chat history; the user row itself stays.
pub async fn reset_messages(db_pool: &SqlitePool, user_id: &str) -> AppResult<()> {
    sqlx::query("DELETE FROM chat_messages WHERE user_id=?")
        .bind(user_id)
        .execute(db_pool)
        .await?;
    Ok(())
}

pub async fn add_contact_message(
    db_pool: &SqlitePool,
    user_id: &str,
    message: &str,
) -> AppResult<ContactMessage> {
    Ok(sqlx::query_as(
        "INSERT INTO contact_messages (user_id,message) VALUES (?,?) \
         RETURNING id,user_id,message,created_at",
    )
    .bind(user_id)
    .bind(message)
    .fetch_one(db_pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn test_pool() -> (SqlitePool, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}/test.db", dir.path().display());
        let db_pool = connect(&url).await.expect("connect");
        (db_pool, dir)
    }

    #[tokio::test]
    async fn messages_round_trip_in_order() {
        let (db_pool, _dir) = test_pool().await;
        let user_id = Uuid::new_v4().to_string();
        add_user(&db_pool, &user_id, None, None).await.unwrap();

        let first = add_message(&db_pool, &user_id, ChatRole::User, "hello").await.unwrap();
        let second = add_message(&db_pool, &user_id, ChatRole::Assistant, "hi there").await.unwrap();
        assert!(second.id > first.id);

        let messages = get_messages(&db_pool, &user_id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "hello");
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, "hi there");
    }

    #[tokio::test]
    async fn unknown_user_reads_as_empty() {
        let (db_pool, _dir) = test_pool().await;
        let user_id = Uuid::new_v4().to_string();
        assert!(!user_exists(&db_pool, &user_id).await.unwrap());
        assert!(get_messages(&db_pool, &user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_keeps_the_user_row() {
        let (db_pool, _dir) = test_pool().await;
        let user_id = Uuid::new_v4().to_string();
        add_user(&db_pool, &user_id, None, None).await.unwrap();
        add_message(&db_pool, &user_id, ChatRole::User, "hello").await.unwrap();

        reset_messages(&db_pool, &user_id).await.unwrap();
        assert!(get_messages(&db_pool, &user_id).await.unwrap().is_empty());
        assert!(user_exists(&db_pool, &user_id).await.unwrap());
    }

    #[tokio::test]
    async fn update_user_is_partial() {
        let (db_pool, _dir) = test_pool().await;
        let user_id = Uuid::new_v4().to_string();
        add_user(&db_pool, &user_id, Some("Ada"), Some("ada@example.com"))
            .await
            .unwrap();

        let updated = update_user(&db_pool, &user_id, None, Some("ada@new.example"))
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Ada"));
        assert_eq!(updated.email.as_deref(), Some("ada@new.example"));
    }

    #[tokio::test]
    async fn adding_twice_fails() {
        let (db_pool, _dir) = test_pool().await;
        let user_id = Uuid::new_v4().to_string();
        add_user(&db_pool, &user_id, None, None).await.unwrap();
        assert!(add_user(&db_pool, &user_id, None, None).await.is_err());
    }

    #[tokio::test]
    async fn contact_messages_require_a_user() {
        let (db_pool, _dir) = test_pool().await;
        let user_id = Uuid::new_v4().to_string();
        assert!(add_contact_message(&db_pool, &user_id, "hi").await.is_err());

        add_user(&db_pool, &user_id, None, None).await.unwrap();
        let saved = add_contact_message(&db_pool, &user_id, "hi").await.unwrap();
        assert_eq!(saved.user_id, user_id);
        assert_eq!(saved.message, "hi");
    }
}
