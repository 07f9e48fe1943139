pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod messages;
pub mod profiles;
pub mod res;
pub mod session;

use axum::{extract::FromRef, routing::get, Router};
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub use appresult::{AppError, AppResult};
pub use config::Config;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
}

/// Builds the whole application: API routes, the share page and the session layer.
pub fn app(db_pool: SqlitePool, config: &Config) -> Router {
    Router::new()
        .route("/", get(res::landing))
        .merge(auth::router())
        .merge(profiles::router())
        .merge(messages::router())
        .fallback(res::not_found)
        .with_state(AppState { db_pool })
        .layer(session::layer(config))
        .layer(TraceLayer::new_for_http())
}

/// Parses a JSON request body. Owner handlers take the raw body and call this
/// after the session check, so an anonymous caller always sees 401 first.
/// An empty body reads as `{}`.
pub(crate) fn json_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    let body = match body.iter().all(u8::is_ascii_whitespace) {
        true => b"{}".as_slice(),
        false => body,
    };
    serde_json::from_slice(body).map_err(|_| AppError::Validation("Invalid JSON body".to_owned()))
}

/// A form or JSON field counts as absent when it is missing or blank.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        name: Option<String>,
    }

    #[test]
    fn json_body_parsing() {
        let body: Body = json_body(br#"{"name":"My BF"}"#).unwrap();
        assert_eq!(body.name.as_deref(), Some("My BF"));

        let body: Body = json_body(b"").unwrap();
        assert!(body.name.is_none());
        let body: Body = json_body(b" \n").unwrap();
        assert!(body.name.is_none());

        let err = json_body::<Body>(b"name=My+BF").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = json_body::<Body>(b"[1, 2]").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
