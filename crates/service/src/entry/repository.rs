use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::Entry;
use crate::errors::ServiceError;

/// Repository abstraction for entry persistence.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn list_by_recency(&self) -> Result<Vec<Entry>, ServiceError>;
    async fn list_by_popularity(&self) -> Result<Vec<Entry>, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<Entry>, ServiceError>;
    /// Persist a new entry. `why` is already trimmed and non-empty.
    async fn create(&self, why: &str, regret: Option<&str>) -> Result<Entry, ServiceError>;
    /// Add exactly one upvote in the store itself; no read-modify-write.
    async fn increment_upvote(&self, id: i32) -> Result<Entry, ServiceError>;
}

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmEntryRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl EntryRepository for SeaOrmEntryRepository {
    async fn list_by_recency(&self) -> Result<Vec<Entry>, ServiceError> {
        Ok(models::entry::list_by_recency(&self.db).await?)
    }

    async fn list_by_popularity(&self) -> Result<Vec<Entry>, ServiceError> {
        Ok(models::entry::list_by_popularity(&self.db).await?)
    }

    async fn get(&self, id: i32) -> Result<Option<Entry>, ServiceError> {
        Ok(models::entry::find(&self.db, id).await?)
    }

    async fn create(&self, why: &str, regret: Option<&str>) -> Result<Entry, ServiceError> {
        Ok(models::entry::create(&self.db, why, regret).await?)
    }

    async fn increment_upvote(&self, id: i32) -> Result<Entry, ServiceError> {
        if !models::entry::increment_upvotes(&self.db, id).await? {
            return Err(ServiceError::not_found("entry"));
        }
        models::entry::find(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("entry"))
    }
}

/// In-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    use chrono::Utc;
    use dashmap::DashMap;

    #[derive(Default)]
    pub struct MockEntryRepository {
        rows: DashMap<i32, Entry>,
        last_id: AtomicI32,
    }

    impl MockEntryRepository {
        pub fn len(&self) -> usize { self.rows.len() }

        pub fn is_empty(&self) -> bool { self.rows.is_empty() }

        /// Insert a row as-is, bypassing validation; for arranging test fixtures.
        pub fn insert_raw(&self, entry: Entry) {
            self.last_id.fetch_max(entry.id, Ordering::SeqCst);
            self.rows.insert(entry.id, entry);
        }

        fn snapshot(&self) -> Vec<Entry> {
            self.rows.iter().map(|r| r.value().clone()).collect()
        }
    }

    #[async_trait]
    impl EntryRepository for MockEntryRepository {
        async fn list_by_recency(&self) -> Result<Vec<Entry>, ServiceError> {
            let mut rows = self.snapshot();
            rows.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
            Ok(rows)
        }

        async fn list_by_popularity(&self) -> Result<Vec<Entry>, ServiceError> {
            let mut rows = self.snapshot();
            rows.sort_by(|a, b| {
                b.upvotes
                    .cmp(&a.upvotes)
                    .then(b.created.cmp(&a.created))
                    .then(b.id.cmp(&a.id))
            });
            Ok(rows)
        }

        async fn get(&self, id: i32) -> Result<Option<Entry>, ServiceError> {
            Ok(self.rows.get(&id).map(|r| r.value().clone()))
        }

        async fn create(&self, why: &str, regret: Option<&str>) -> Result<Entry, ServiceError> {
            let why = models::entry::validate_why(why)?;
            let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
            let entry = Entry {
                id,
                why,
                regret: models::entry::normalize_text(regret),
                upvotes: 0,
                created: Utc::now(),
            };
            self.rows.insert(id, entry.clone());
            Ok(entry)
        }

        async fn increment_upvote(&self, id: i32) -> Result<Entry, ServiceError> {
            // get_mut holds the shard lock, so concurrent increments serialize
            let mut row = self.rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("entry"))?;
            row.upvotes += 1;
            Ok(row.value().clone())
        }
    }
}
