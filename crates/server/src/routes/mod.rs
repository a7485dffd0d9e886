use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use common::types::Health;

use crate::render;
use crate::state::AppState;

pub mod entries;
pub mod upvote;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(render::error_page(StatusCode::NOT_FOUND, "No such page.")))
}

/// Route ids are plain decimal digits; anything else does not match.
pub(crate) fn parse_entry_id(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i32>().ok()
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route("/", get(entries::index))
        .route("/sort-by-upvotes", get(entries::index_by_upvotes))
        .route("/add", get(entries::add_form).post(entries::add_post))
        .route("/:entry_id", get(entries::view_entry));

    let api = Router::new()
        .route("/health", get(health))
        .route("/upvote/:entry_id", get(upvote::upvote_entry))
        .route("/session/upvotes", get(upvote::session_upvotes));

    pages
        .merge(api)
        .fallback(not_found)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx logged as ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}

#[cfg(test)]
mod tests {
    use super::parse_entry_id;

    #[test]
    fn entry_ids_are_digits_only() {
        assert_eq!(parse_entry_id("7"), Some(7));
        assert_eq!(parse_entry_id("007"), Some(7));
        assert_eq!(parse_entry_id(""), None);
        assert_eq!(parse_entry_id("-1"), None);
        assert_eq!(parse_entry_id("+1"), None);
        assert_eq!(parse_entry_id("abc"), None);
        assert_eq!(parse_entry_id("99999999999"), None);
    }
}
