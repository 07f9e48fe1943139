use axum::{debug_handler, extract::State, response::Redirect, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::{db::Message, present, AppError, AppResult};

pub const MAX_CONTENT_CHARS: usize = 5000;
pub const MAX_EMOJI_CHARS: usize = 16;
pub const MAX_EXPECTED_RESPONSE_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitMessageForm {
    slug: Option<String>,
    content: Option<String>,
    emoji: Option<String>,
    expected_response: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewMessage<'a> {
    pub content: &'a str,
    pub emoji: &'a str,
    pub expected_response: Option<&'a str>,
}

#[debug_handler]
pub(crate) async fn submit(
    State(db_pool): State<SqlitePool>,
    Form(SubmitMessageForm { slug, content, emoji, expected_response }): Form<SubmitMessageForm>,
) -> AppResult<Redirect> {
    let (Some(slug), Some(content), Some(emoji)) = (present(slug), present(content), present(emoji)) else {
        return Err(AppError::Validation("Missing fields".to_owned()));
    };

    let message = NewMessage {
        content: &content,
        emoji: &emoji,
        expected_response: expected_response.as_deref(),
    };
    submit_message(&db_pool, &slug, message).await?;

    // only existing slugs get here, and those are url-safe
    Ok(Redirect::to(&format!("/share/{}?submitted=true", slug.trim())))
}

/// Files an anonymous message under the person behind `slug`.
pub async fn submit_message(db_pool: &SqlitePool, slug: &str, new: NewMessage<'_>) -> AppResult<Message> {
    let content = new.content.trim();
    let emoji = new.emoji.trim();
    let expected_response = new.expected_response
        .map(str::trim)
        .filter(|response| !response.is_empty());

    if content.is_empty() || emoji.is_empty() {
        return Err(AppError::Validation("Missing fields".to_owned()));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::Validation(format!("Message is longer than {MAX_CONTENT_CHARS} characters")));
    }
    if emoji.chars().count() > MAX_EMOJI_CHARS {
        return Err(AppError::Validation("Invalid mood".to_owned()));
    }
    if expected_response.is_some_and(|response| response.chars().count() > MAX_EXPECTED_RESPONSE_CHARS) {
        return Err(AppError::Validation(format!("Expected response is longer than {MAX_EXPECTED_RESPONSE_CHARS} characters")));
    }

    let Some((person_id,)): Option<(Uuid,)> = sqlx::query_as("SELECT id FROM persons WHERE slug=?")
        .bind(slug.trim())
        .fetch_optional(db_pool)
        .await?
    else {
        return Err(AppError::NotFound("Invalid link"));
    };

    let message = Message {
        id: Uuid::now_v7(),
        person_id,
        content: content.to_owned(),
        emoji: emoji.to_owned(),
        expected_response: expected_response.map(str::to_owned),
        resolved: false,
        created_at: OffsetDateTime::now_utc(),
    };

    sqlx::query("INSERT INTO messages (id,person_id,content,emoji,expected_response,resolved,created_at) VALUES (?,?,?,?,?,?,?)")
        .bind(message.id)
        .bind(message.person_id)
        .bind(&message.content)
        .bind(&message.emoji)
        .bind(&message.expected_response)
        .bind(message.resolved)
        .bind(message.created_at)
        .execute(db_pool)
        .await?;

    info!("message {} filed for {slug}", message.id);
    Ok(message)
}
