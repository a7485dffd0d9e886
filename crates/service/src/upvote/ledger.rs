use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;
use sea_orm::DatabaseConnection;

use super::session::SessionId;
use crate::errors::ServiceError;

/// Per-session record of which entries have been upvoted.
/// Implementations can be database-backed or in-process.
#[async_trait]
pub trait UpvoteLedger: Send + Sync {
    async fn contains(&self, session: &SessionId, entry_id: i32) -> Result<bool, ServiceError>;
    /// Atomically add `entry_id` to the session's set. Returns false when it
    /// was already present; of several concurrent callers exactly one wins.
    async fn record(&self, session: &SessionId, entry_id: i32) -> Result<bool, ServiceError>;
    async fn entries(&self, session: &SessionId) -> Result<Vec<i32>, ServiceError>;
}

/// SeaORM-backed ledger over the `session_upvote` table.
#[derive(Clone)]
pub struct SeaOrmUpvoteLedger {
    pub db: DatabaseConnection,
}

#[async_trait]
impl UpvoteLedger for SeaOrmUpvoteLedger {
    async fn contains(&self, session: &SessionId, entry_id: i32) -> Result<bool, ServiceError> {
        Ok(models::session_upvote::contains(&self.db, session.as_str(), entry_id).await?)
    }

    async fn record(&self, session: &SessionId, entry_id: i32) -> Result<bool, ServiceError> {
        Ok(models::session_upvote::record(&self.db, session.as_str(), entry_id).await?)
    }

    async fn entries(&self, session: &SessionId) -> Result<Vec<i32>, ServiceError> {
        Ok(models::session_upvote::entry_ids_for(&self.db, session.as_str()).await?)
    }
}

/// Process-local ledger; sets live as long as the process.
#[derive(Default)]
pub struct InMemoryUpvoteLedger {
    sets: DashMap<SessionId, HashSet<i32>>,
}

#[async_trait]
impl UpvoteLedger for InMemoryUpvoteLedger {
    async fn contains(&self, session: &SessionId, entry_id: i32) -> Result<bool, ServiceError> {
        Ok(self.sets.get(session).map(|s| s.contains(&entry_id)).unwrap_or(false))
    }

    async fn record(&self, session: &SessionId, entry_id: i32) -> Result<bool, ServiceError> {
        // entry() locks the shard for the whole check-and-insert
        Ok(self.sets.entry(session.clone()).or_default().insert(entry_id))
    }

    async fn entries(&self, session: &SessionId) -> Result<Vec<i32>, ServiceError> {
        let mut ids: Vec<i32> = self
            .sets
            .get(session)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        Ok(ids)
    }
}
