use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::{ledger::UpvoteLedger, session::SessionId};
use crate::entry::{repository::EntryRepository, Entry};
use crate::errors::ServiceError;

/// Enforces at most one upvote per entry per session.
pub struct UpvoteGuard<R: EntryRepository, L: UpvoteLedger> {
    entries: Arc<R>,
    ledger: Arc<L>,
}

impl<R: EntryRepository, L: UpvoteLedger> Clone for UpvoteGuard<R, L> {
    fn clone(&self) -> Self {
        Self { entries: Arc::clone(&self.entries), ledger: Arc::clone(&self.ledger) }
    }
}

impl<R: EntryRepository, L: UpvoteLedger> UpvoteGuard<R, L> {
    pub fn new(entries: Arc<R>, ledger: Arc<L>) -> Self { Self { entries, ledger } }

    /// Upvote `entry_id` on behalf of `session`.
    ///
    /// - unknown entry: `NotFound`, nothing recorded
    /// - already upvoted in this session: `Conflict`, entry untouched
    /// - otherwise the id is recorded and the entry gains exactly one upvote
    ///
    /// Recording is an atomic insert-if-absent, so two racing requests from
    /// the same session cannot both get past it.
    #[instrument(skip(self), fields(session_id = %session))]
    pub async fn try_upvote(&self, session: &SessionId, entry_id: i32) -> Result<Entry, ServiceError> {
        // Entries are never deleted, so existence checked here still holds below.
        if self.entries.get(entry_id).await?.is_none() {
            return Err(ServiceError::not_found("entry"));
        }
        if !self.ledger.record(session, entry_id).await? {
            warn!(entry_id, "repeat upvote rejected");
            return Err(ServiceError::Conflict(format!("entry {} already upvoted in this session", entry_id)));
        }
        let updated = self.entries.increment_upvote(entry_id).await?;
        info!(entry_id, upvotes = updated.upvotes, "entry_upvoted");
        Ok(updated)
    }

    pub async fn has_upvoted(&self, session: &SessionId, entry_id: i32) -> Result<bool, ServiceError> {
        self.ledger.contains(session, entry_id).await
    }

    pub async fn upvoted_entries(&self, session: &SessionId) -> Result<Vec<i32>, ServiceError> {
        self.ledger.entries(session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::repository::mock::MockEntryRepository;
    use crate::upvote::ledger::InMemoryUpvoteLedger;
    use chrono::Utc;

    fn guard_with_entry(id: i32, upvotes: i32) -> (Arc<MockEntryRepository>, UpvoteGuard<MockEntryRepository, InMemoryUpvoteLedger>) {
        let repo = Arc::new(MockEntryRepository::default());
        repo.insert_raw(Entry { id, why: "why".into(), regret: None, upvotes, created: Utc::now() });
        let guard = UpvoteGuard::new(repo.clone(), Arc::new(InMemoryUpvoteLedger::default()));
        (repo, guard)
    }

    async fn upvotes(repo: &MockEntryRepository, id: i32) -> i32 {
        repo.get(id).await.unwrap().unwrap().upvotes
    }

    #[tokio::test]
    async fn second_upvote_same_session_conflicts() {
        let (repo, guard) = guard_with_entry(7, 0);
        let s = SessionId::new_random();

        let first = guard.try_upvote(&s, 7).await.unwrap();
        assert_eq!(first.upvotes, 1);

        let second = guard.try_upvote(&s, 7).await;
        assert!(matches!(second, Err(ServiceError::Conflict(_))));
        assert_eq!(upvotes(&repo, 7).await, 1);
        assert!(guard.has_upvoted(&s, 7).await.unwrap());
    }

    #[tokio::test]
    async fn different_sessions_both_count() {
        let (repo, guard) = guard_with_entry(7, 0);
        guard.try_upvote(&SessionId::new_random(), 7).await.unwrap();
        guard.try_upvote(&SessionId::new_random(), 7).await.unwrap();
        assert_eq!(upvotes(&repo, 7).await, 2);
    }

    #[tokio::test]
    async fn unknown_entry_is_not_recorded() {
        let (_, guard) = guard_with_entry(7, 0);
        let s = SessionId::new_random();
        assert!(matches!(guard.try_upvote(&s, 8).await, Err(ServiceError::NotFound(_))));
        assert!(guard.upvoted_entries(&s).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn racing_requests_same_session_count_once() {
        let (repo, guard) = guard_with_entry(7, 5);
        let s = SessionId::new_random();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let guard = guard.clone();
            let s = s.clone();
            handles.push(tokio::spawn(async move { guard.try_upvote(&s, 7).await.is_ok() }));
        }
        let mut ok = 0;
        for h in handles {
            if h.await.unwrap() { ok += 1; }
        }
        assert_eq!(ok, 1);
        assert_eq!(upvotes(&repo, 7).await, 6);
    }
}
