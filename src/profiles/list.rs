use std::collections::HashMap;

use axum::{debug_handler, extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{db::{Message, Person}, session, AppResult};

#[derive(Debug, Serialize)]
pub struct PersonWithMessages {
    #[serde(flatten)]
    pub person: Person,
    pub messages: Vec<Message>,
}

#[debug_handler]
pub(crate) async fn list_persons(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<Value>> {
    let Some(user) = session::current_user(&session).await? else {
        return Ok(Json(json!({ "person": [] })));
    };

    let persons = persons_with_messages(&db_pool, user.id).await?;
    Ok(Json(json!({ "person": persons })))
}

/// Every person owned by `user_id`, oldest first, each with its messages newest first.
pub async fn persons_with_messages(db_pool: &SqlitePool, user_id: Uuid) -> AppResult<Vec<PersonWithMessages>> {
    let persons: Vec<Person> = sqlx::query_as("SELECT * FROM persons WHERE user_id=? ORDER BY created_at, id")
        .bind(user_id)
        .fetch_all(db_pool)
        .await?;

    let messages: Vec<Message> = sqlx::query_as(
        "SELECT m.* FROM messages m JOIN persons p ON p.id=m.person_id WHERE p.user_id=? ORDER BY m.created_at DESC, m.id DESC",
    )
        .bind(user_id)
        .fetch_all(db_pool)
        .await?;

    let mut by_person: HashMap<Uuid, Vec<Message>> = HashMap::new();
    for message in messages {
        by_person.entry(message.person_id).or_default().push(message);
    }

    Ok(
        persons
            .into_iter()
            .map(|person| PersonWithMessages {
                messages: by_person.remove(&person.id).unwrap_or_default(),
                person,
            })
            .collect()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::create_user, db, messages::{submit_message, NewMessage}, profiles::create_person};

    #[tokio::test]
    async fn messages_attach_to_their_person_only() {
        let db_pool = db::connect_in_memory().await.unwrap();
        let alice = create_user(&db_pool, "alice", "pw123456", None).await.unwrap();
        let bob = create_user(&db_pool, "bob", "pw123456", None).await.unwrap();

        let bf = create_person(&db_pool, alice.id, "My BF").await.unwrap();
        let ex = create_person(&db_pool, alice.id, "My Ex").await.unwrap();
        let bobs = create_person(&db_pool, bob.id, "Someone").await.unwrap();

        let message = NewMessage { content: "You forgot our anniversary", emoji: "😢", expected_response: None };
        submit_message(&db_pool, &bf.slug, message).await.unwrap();
        submit_message(&db_pool, &bobs.slug, NewMessage { content: "hi", emoji: "😊", expected_response: None }).await.unwrap();

        let listing = persons_with_messages(&db_pool, alice.id).await.unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].person.slug, bf.slug);
        assert_eq!(listing[0].messages.len(), 1);
        assert_eq!(listing[0].messages[0].content, "You forgot our anniversary");
        assert!(!listing[0].messages[0].resolved);
        assert_eq!(listing[1].person.slug, ex.slug);
        assert!(listing[1].messages.is_empty());
    }

    #[tokio::test]
    async fn serializes_flat_with_camel_case() {
        let db_pool = db::connect_in_memory().await.unwrap();
        let alice = create_user(&db_pool, "alice", "pw123456", None).await.unwrap();
        let bf = create_person(&db_pool, alice.id, "My BF").await.unwrap();
        submit_message(&db_pool, &bf.slug, NewMessage { content: "hm", emoji: "😡", expected_response: Some("Just say sorry and mean it") }).await.unwrap();

        let listing = persons_with_messages(&db_pool, alice.id).await.unwrap();
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json[0]["slug"], bf.slug.as_str());
        assert_eq!(json[0]["userId"], alice.id.to_string());
        assert_eq!(json[0]["messages"][0]["expectedResponse"], "Just say sorry and mean it");
        assert_eq!(json[0]["messages"][0]["personId"], bf.id.to_string());
    }
}
