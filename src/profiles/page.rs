use axum::{debug_handler, extract::{Path, Query, State}, response::{Html, IntoResponse, Response}};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{include_res, messages::{EXPECTED_RESPONSES, MOODS}, res::{self, escape_html}, AppResult};

#[derive(Deserialize)]
pub(crate) struct ShareQuery {
    submitted: Option<bool>,
}

#[debug_handler]
pub(crate) async fn share(
    Path(slug): Path<String>,
    Query(ShareQuery { submitted }): Query<ShareQuery>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let Some((name, owner)): Option<(String, String)> =
        sqlx::query_as("SELECT p.name,u.name FROM persons p JOIN users u ON u.id=p.user_id WHERE p.slug=?")
            .bind(&slug)
            .fetch_optional(&db_pool)
            .await?
    else {
        return res::sorry("link");
    };

    let moods: String = MOODS
        .iter()
        .map(|mood| include_res!(str, "/pages/share/mood.html").replace("{mood}", mood))
        .collect();

    let responses: String = EXPECTED_RESPONSES
        .iter()
        .map(|response| include_res!(str, "/pages/share/response.html").replace("{response}", &escape_html(response)))
        .collect();

    let banner = match submitted {
        Some(true) => include_res!(str, "/pages/share/submitted.html"),
        _ => "",
    };

    Ok(Html(
        include_res!(str, "/pages/share/share.html")
        .replace("{banner}", banner)
        .replace("{moods}", &moods)
        .replace("{responses}", &responses)
        .replace("{slug}", &escape_html(&slug))
        .replace("{owner}", &escape_html(&owner))
        .replace("{name}", &escape_html(&name))
    ).into_response())
}
