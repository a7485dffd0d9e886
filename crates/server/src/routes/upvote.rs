use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use common::types::UpvoteAck;
use service::errors::ServiceError;

use super::parse_entry_id;
use crate::{errors::JsonApiError, session, state::AppState};

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

/// `GET /upvote/:entry_id`: one upvote per entry per browser session.
/// 200 `success` (or a JSON ack), 409 on a repeat, 404 for unknown entries.
pub async fn upvote_entry(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    headers: HeaderMap,
    Path(raw): Path<String>,
) -> Result<(SignedCookieJar, Response), JsonApiError> {
    let entry_id = parse_entry_id(&raw).ok_or_else(|| ServiceError::not_found("entry"))?;
    let (jar, session_id) = session::ensure(jar, &state.session);
    let updated = state.guard.try_upvote(&session_id, entry_id).await?;

    let body = if wants_json(&headers) {
        Json(UpvoteAck { entry_id: updated.id, upvotes: updated.upvotes }).into_response()
    } else {
        "success".into_response()
    };
    Ok((jar, body))
}

/// Entry ids this browser session has already upvoted.
pub async fn session_upvotes(State(state): State<AppState>, jar: SignedCookieJar) -> Result<Json<Vec<i32>>, JsonApiError> {
    let Some(session_id) = session::current(&jar, &state.session) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.guard.upvoted_entries(&session_id).await?))
}
