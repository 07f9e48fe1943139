use axum::{debug_handler, extract::Query, response::{IntoResponse, Redirect, Response}, Json};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use crate::{session, AppResult};

#[derive(Deserialize)]
pub(crate) struct LogoutQuery {
    pub(crate) return_url: Option<String>,
}

#[debug_handler]
pub(crate) async fn logout(
    Query(LogoutQuery { return_url }): Query<LogoutQuery>,
    session: Session
) -> AppResult<Response> {
    session::sign_out(&session).await?;

    Ok(match return_url.filter(|url| is_local(url)) {
        Some(return_url) => Redirect::to(&return_url).into_response(),
        None => Json(json!({ "success": true })).into_response(),
    })
}

// only paths on this site, never `//host` or absolute urls
fn is_local(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.starts_with("/\\")
}

#[cfg(test)]
mod tests {
    use super::is_local;

    #[test]
    fn only_local_return_urls() {
        assert!(is_local("/"));
        assert!(is_local("/share/abc"));
        assert!(!is_local("//evil.example"));
        assert!(!is_local("https://evil.example"));
        assert!(!is_local("/\\evil.example"));
    }
}
