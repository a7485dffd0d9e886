use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::repository::EntryRepository;
use super::Entry;
use crate::errors::ServiceError;

/// Which of the two list views to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest `created` first.
    #[default]
    Recent,
    /// Highest `upvotes` first.
    Popular,
}

/// Entry business service independent of web framework
pub struct EntryService<R: EntryRepository> {
    repo: Arc<R>,
}

impl<R: EntryRepository> Clone for EntryService<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: EntryRepository> EntryService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn list(&self, order: SortOrder) -> Result<Vec<Entry>, ServiceError> {
        let rows = match order {
            SortOrder::Recent => self.repo.list_by_recency().await?,
            SortOrder::Popular => self.repo.list_by_popularity().await?,
        };
        debug!(?order, count = rows.len(), "listed entries");
        Ok(rows)
    }

    pub async fn list_by_recency(&self) -> Result<Vec<Entry>, ServiceError> { self.list(SortOrder::Recent).await }

    pub async fn list_by_popularity(&self) -> Result<Vec<Entry>, ServiceError> { self.list(SortOrder::Popular).await }

    pub async fn get_by_id(&self, id: i32) -> Result<Entry, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("entry"))
    }

    /// Create an entry from raw form input.
    ///
    /// A missing or blank `why` is not an error: nothing is stored and
    /// `Ok(None)` comes back.
    ///
    /// # Examples
    /// ```
    /// use service::entry::{repository::mock::MockEntryRepository, service::EntryService};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockEntryRepository::default());
    /// let svc = EntryService::new(repo.clone());
    /// let created = tokio_test::block_on(svc.create(Some("  hello  "), Some("  sorry  "))).unwrap().unwrap();
    /// assert_eq!(created.why, "hello");
    /// assert_eq!(created.regret.as_deref(), Some("sorry"));
    /// assert!(tokio_test::block_on(svc.create(Some("   "), Some("x"))).unwrap().is_none());
    /// assert_eq!(repo.len(), 1);
    /// ```
    #[instrument(skip_all)]
    pub async fn create(&self, why: Option<&str>, regret: Option<&str>) -> Result<Option<Entry>, ServiceError> {
        let Some(why) = models::entry::normalize_text(why) else {
            debug!("empty why; nothing stored");
            return Ok(None);
        };
        let regret = models::entry::normalize_text(regret);
        let created = self.repo.create(&why, regret.as_deref()).await?;
        info!(entry_id = created.id, has_regret = created.regret.is_some(), "entry_created");
        Ok(Some(created))
    }

    #[instrument(skip(self))]
    pub async fn increment_upvote(&self, id: i32) -> Result<Entry, ServiceError> {
        self.repo.increment_upvote(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::repository::mock::MockEntryRepository;
    use chrono::{Duration, Utc};

    fn svc() -> (Arc<MockEntryRepository>, EntryService<MockEntryRepository>) {
        let repo = Arc::new(MockEntryRepository::default());
        (repo.clone(), EntryService::new(repo))
    }

    fn row(id: i32, why: &str, upvotes: i32, age_minutes: i64) -> Entry {
        Entry {
            id,
            why: why.to_string(),
            regret: None,
            upvotes,
            created: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn create_sets_defaults() {
        let (_, svc) = svc();
        let before = Utc::now();
        let e = svc.create(Some("because"), None).await.unwrap().unwrap();
        assert_eq!(e.upvotes, 0);
        assert!(e.created >= before);
        assert!(e.regret.is_none());
    }

    #[tokio::test]
    async fn create_trims_both_fields() {
        let (_, svc) = svc();
        let e = svc.create(Some("  hello  "), Some("  sorry  ")).await.unwrap().unwrap();
        assert_eq!(e.why, "hello");
        assert_eq!(e.regret.as_deref(), Some("sorry"));
    }

    #[tokio::test]
    async fn create_skips_empty_or_missing_why() {
        let (repo, svc) = svc();
        assert!(svc.create(Some(""), Some("r")).await.unwrap().is_none());
        assert!(svc.create(None, Some("r")).await.unwrap().is_none());
        assert!(svc.create(Some(" \t "), None).await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn lists_follow_requested_order() {
        let (repo, svc) = svc();
        repo.insert_raw(row(1, "old-popular", 9, 60));
        repo.insert_raw(row(2, "new-quiet", 0, 1));
        repo.insert_raw(row(3, "mid", 4, 30));

        let recent: Vec<i32> = svc.list_by_recency().await.unwrap().iter().map(|e| e.id).collect();
        assert_eq!(recent, vec![2, 3, 1]);

        let popular: Vec<i32> = svc.list_by_popularity().await.unwrap().iter().map(|e| e.id).collect();
        assert_eq!(popular, vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn increment_adds_one() {
        let (repo, svc) = svc();
        repo.insert_raw(row(7, "seven", 5, 0));
        let e = svc.increment_upvote(7).await.unwrap();
        assert_eq!(e.upvotes, 6);
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let (_, svc) = svc();
        assert!(matches!(svc.get_by_id(99).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.increment_upvote(99).await, Err(ServiceError::NotFound(_))));
    }
}
