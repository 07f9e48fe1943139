use axum::{body::Bytes, debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;
use tracing::info;
use uuid::Uuid;

use crate::{db::{self, Person}, json_body, present, session, AppError, AppResult};

use super::slug;

#[derive(Debug, Deserialize)]
pub(crate) struct NewPersonBody {
    name: Option<String>,
}

#[debug_handler]
pub(crate) async fn new_person(
    State(db_pool): State<SqlitePool>,
    session: Session,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let user = session::require_user(&session).await?;
    let NewPersonBody { name } = json_body(&body)?;

    let Some(name) = present(name) else {
        return Err(AppError::Validation("Missing name".to_owned()));
    };

    let person = create_person(&db_pool, user.id, &name).await?;
    Ok(Json(json!({ "person": person })))
}

pub async fn create_person(db_pool: &SqlitePool, user_id: Uuid, name: &str) -> AppResult<Person> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Missing name".to_owned()));
    }

    if sqlx::query("SELECT 1 FROM users WHERE id=?")
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?
        .is_none() {
        return Err(AppError::NotFound("User not found"));
    }

    let person = Person {
        id: Uuid::now_v7(),
        user_id,
        name: name.to_owned(),
        slug: slug::generate(name),
        created_at: OffsetDateTime::now_utc(),
    };

    sqlx::query("INSERT INTO persons (id,user_id,name,slug,created_at) VALUES (?,?,?,?,?)")
        .bind(person.id)
        .bind(person.user_id)
        .bind(&person.name)
        .bind(&person.slug)
        .bind(person.created_at)
        .execute(db_pool)
        .await
        .map_err(|err| match db::is_unique_violation(&err) {
            true => AppError::Conflict("Slug already taken, try again".to_owned()),
            false => err.into(),
        })?;

    info!("created person {:?} with slug {} for #{user_id}", person.name, person.slug);
    Ok(person)
}
