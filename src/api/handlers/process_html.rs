//! Handler for HTML link rewriting.

use axum::{
    extract::State,
    http::{HeaderMap, header},
    response::Html,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Rewrites every anchor of an HTML document to a new short link.
///
/// # Endpoint
///
/// `POST /process-html` with `Content-Type: text/html`
///
/// Every distinct `href` is registered before the response is produced, so the
/// returned links resolve immediately.
///
/// # Errors
///
/// Returns 400 Bad Request if the content type is not `text/html`.
pub async fn process_html_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Html<String>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("text/html")
    {
        return Err(AppError::bad_request(
            "Content-Type must be text/html",
            json!({ "content_type": content_type }),
        ));
    }

    let rewritten = state.link_service.rewrite_html(&body)?;

    Ok(Html(rewritten))
}
