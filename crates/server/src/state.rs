use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use configs::SessionConfig;
use models::db::DatabaseConnection;
use service::entry::{repository::SeaOrmEntryRepository, service::EntryService};
use service::upvote::{ledger::SeaOrmUpvoteLedger, UpvoteGuard};
use tracing::warn;

pub type Entries = EntryService<SeaOrmEntryRepository>;
pub type Guard = UpvoteGuard<SeaOrmEntryRepository, SeaOrmUpvoteLedger>;

/// Session cookie settings resolved at startup.
#[derive(Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub key: Key,
}

impl SessionSettings {
    /// Derive the signing key from the configured secret, or generate a random
    /// one when none is configured (sessions then reset on restart).
    pub fn from_config(cfg: &SessionConfig) -> Self {
        let key = match cfg.secret.as_deref() {
            Some(secret) => Key::derive_from(secret.as_bytes()),
            None => {
                warn!("no session secret configured; using a random key, upvote sessions reset on restart");
                Key::generate()
            }
        };
        Self { cookie_name: cfg.cookie_name.clone(), key }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub entries: Entries,
    pub guard: Guard,
    pub session: SessionSettings,
}

impl AppState {
    pub fn new(db: DatabaseConnection, session: SessionSettings) -> Self {
        let repo = Arc::new(SeaOrmEntryRepository { db: db.clone() });
        let ledger = Arc::new(SeaOrmUpvoteLedger { db });
        Self {
            entries: EntryService::new(Arc::clone(&repo)),
            guard: UpvoteGuard::new(repo, ledger),
            session,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self { state.session.key.clone() }
}
