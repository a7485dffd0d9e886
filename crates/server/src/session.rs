//! Browser session carried in a signed cookie.
//!
//! The cookie only holds a random session id; the set of upvoted entries
//! lives server side in the upvote ledger.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use service::upvote::SessionId;
use tracing::debug;

use crate::state::SessionSettings;

/// Session id from a verified cookie, if there is one.
pub fn current(jar: &SignedCookieJar, settings: &SessionSettings) -> Option<SessionId> {
    jar.get(&settings.cookie_name).and_then(|c| SessionId::parse(c.value()))
}

/// Existing session id, or a fresh one with its cookie added to the jar.
pub fn ensure(jar: SignedCookieJar, settings: &SessionSettings) -> (SignedCookieJar, SessionId) {
    if let Some(id) = current(&jar, settings) {
        return (jar, id);
    }
    let id = SessionId::new_random();
    debug!(session_id = %id, "issuing session cookie");
    let mut cookie = Cookie::new(settings.cookie_name.clone(), id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    (jar.add(cookie), id)
}
