use std::ops::Deref;

use axum::{debug_handler, http::StatusCode, response::{Html, IntoResponse, Response}};
use pulldown_cmark::{html, Event, Options, Parser};

use crate::AppResult;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub struct Markdown<T>(pub T);

impl<T> IntoResponse for Markdown<T>
where
    T: Deref<Target = str>
{
    fn into_response(self) -> Response {
        Html(render_markdown(&self.0)).into_response()
    }
}

/// Markdown to HTML with raw HTML shown as text.
pub fn render_markdown(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            _ => event,
        });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Escapes text for HTML bodies and attributes. Braces are escaped too so
/// user text can never be mistaken for a `{placeholder}`.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    // writing into a String can't fail
    let _ = pulldown_cmark_escape::escape_html(&mut escaped, text);
    escaped.replace('{', "&#123;").replace('}', "&#125;")
}

pub fn sorry(what: &str) -> AppResult<Response> {
    Ok((
        StatusCode::NOT_FOUND,
        Html(include_res!(str, "/pages/sorry.html").replace("{what}", &escape_html(what))),
    ).into_response())
}

#[debug_handler]
pub async fn landing() -> impl IntoResponse {
    Markdown(include_res!(str, "/pages/index.md"))
}

#[debug_handler]
pub async fn not_found() -> AppResult<Response> {
    sorry("page")
}
