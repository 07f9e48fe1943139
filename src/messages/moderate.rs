use axum::{debug_handler, extract::{Query, State}, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::info;
use uuid::Uuid;

use crate::{present, session, AppError, AppResult};

#[derive(Deserialize)]
pub(crate) struct MessageIdQuery {
    id: Option<String>,
}

impl MessageIdQuery {
    fn message_id(self) -> AppResult<Uuid> {
        let Some(id) = present(self.id) else {
            return Err(AppError::Validation("Missing message id".to_owned()));
        };
        // an id that can't parse can't name any message
        Uuid::parse_str(id.trim()).map_err(|_| AppError::NotFound("Message not found"))
    }
}

#[debug_handler]
pub(crate) async fn resolve(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Query(query): Query<MessageIdQuery>,
) -> AppResult<Json<Value>> {
    let user = session::require_user(&session).await?;
    resolve_message(&db_pool, user.id, query.message_id()?).await?;
    Ok(Json(json!({ "success": true })))
}

#[debug_handler]
pub(crate) async fn delete(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Query(query): Query<MessageIdQuery>,
) -> AppResult<Json<Value>> {
    let user = session::require_user(&session).await?;
    delete_message(&db_pool, user.id, query.message_id()?).await?;
    Ok(Json(json!({ "success": true })))
}

/// Marks a message resolved. Resolving twice is a no-op success.
pub async fn resolve_message(db_pool: &SqlitePool, user_id: Uuid, message_id: Uuid) -> AppResult<()> {
    let updated = sqlx::query(
        "UPDATE messages SET resolved=TRUE WHERE id=? AND person_id IN (SELECT id FROM persons WHERE user_id=?)",
    )
        .bind(message_id)
        .bind(user_id)
        .execute(db_pool)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(refusal(db_pool, message_id).await);
    }

    info!("message {message_id} resolved by #{user_id}");
    Ok(())
}

pub async fn delete_message(db_pool: &SqlitePool, user_id: Uuid, message_id: Uuid) -> AppResult<()> {
    let deleted = sqlx::query(
        "DELETE FROM messages WHERE id=? AND person_id IN (SELECT id FROM persons WHERE user_id=?)",
    )
        .bind(message_id)
        .bind(user_id)
        .execute(db_pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(refusal(db_pool, message_id).await);
    }

    info!("message {message_id} deleted by #{user_id}");
    Ok(())
}

/// Why an owner-scoped write touched nothing: the message is gone, or it belongs to someone else.
async fn refusal(db_pool: &SqlitePool, message_id: Uuid) -> AppError {
    let exists = sqlx::query("SELECT 1 FROM messages WHERE id=?")
        .bind(message_id)
        .fetch_optional(db_pool)
        .await;

    match exists {
        Ok(Some(_)) => AppError::Forbidden("Forbidden"),
        Ok(None) => AppError::NotFound("Message not found"),
        Err(err) => err.into(),
    }
}
