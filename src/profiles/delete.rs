use axum::{debug_handler, extract::{Query, State}, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::info;
use uuid::Uuid;

use crate::{present, session, AppError, AppResult};

#[derive(Deserialize)]
pub(crate) struct DeletePersonQuery {
    slug: Option<String>,
}

#[debug_handler]
pub(crate) async fn delete_person(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Query(DeletePersonQuery { slug }): Query<DeletePersonQuery>,
) -> AppResult<Json<Value>> {
    let user = session::require_user(&session).await?;

    let Some(slug) = present(slug) else {
        return Err(AppError::Validation("Missing slug".to_owned()));
    };

    remove_person(&db_pool, user.id, &slug).await?;
    Ok(Json(json!({ "success": true })))
}

/// Deletes an owned person and all of its messages in one transaction.
/// Someone else's slug is indistinguishable from a missing one.
pub async fn remove_person(db_pool: &SqlitePool, user_id: Uuid, slug: &str) -> AppResult<()> {
    let mut tx = db_pool.begin().await?;

    let Some((person_id,)): Option<(Uuid,)> = sqlx::query_as("SELECT id FROM persons WHERE slug=? AND user_id=?")
        .bind(slug)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
    else {
        return Err(AppError::NotFound("Person not found"));
    };

    let messages = sqlx::query("DELETE FROM messages WHERE person_id=?")
        .bind(person_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM persons WHERE id=?")
        .bind(person_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("deleted person {slug} with {messages} messages for #{user_id}");
    Ok(())
}
