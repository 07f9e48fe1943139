use std::str::FromStr;

use serde::Serialize;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, FromRow, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    // unique: id
    // unique: username
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    // unique: id
    // unique: slug
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub person_id: Uuid,
    pub content: String,
    pub emoji: String,
    pub expected_response: Option<String>,
    pub resolved: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    // unique: id
}

/// Opens the pool and brings the schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .foreign_keys(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&db_pool).await?;
    Ok(db_pool)
}

/// A private in-memory database. One connection that never expires, so every
/// query sees the same data.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?
        .foreign_keys(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&db_pool).await?;
    Ok(db_pool)
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|err| err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_rejects_orphan_messages() {
        let db_pool = connect_in_memory().await.unwrap();

        let err = sqlx::query("INSERT INTO messages (id,person_id,content,emoji,resolved,created_at) VALUES (?,?,?,?,?,?)")
            .bind(Uuid::now_v7())
            .bind(Uuid::now_v7())
            .bind("hello")
            .bind("😊")
            .bind(false)
            .bind(OffsetDateTime::now_utc())
            .execute(&db_pool)
            .await
            .unwrap_err();

        assert!(err.as_database_error().is_some_and(|err| err.is_foreign_key_violation()));
    }

    #[tokio::test]
    async fn duplicate_username_is_a_unique_violation() {
        let db_pool = connect_in_memory().await.unwrap();

        let insert = || {
            sqlx::query("INSERT INTO users (id,username,name,password_hash,created_at) VALUES (?,?,?,?,?)")
                .bind(Uuid::now_v7())
                .bind("alice")
                .bind("Alice")
                .bind("hash")
                .bind(OffsetDateTime::now_utc())
                .execute(&db_pool)
        };

        insert().await.unwrap();
        let err = insert().await.unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
