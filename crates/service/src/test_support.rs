#![cfg(test)]
use std::path::PathBuf;
use std::sync::Arc;

use configs::DatabaseConfig;
use sea_orm::DatabaseConnection;

use crate::entry::repository::SeaOrmEntryRepository;
use crate::upvote::ledger::SeaOrmUpvoteLedger;

/// Private in-memory database per call, migrations applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_and_migrate(&DatabaseConfig::in_memory_sqlite()).await
}

/// On-disk SQLite database shared by a multi-connection pool, so queries
/// really run concurrently. The file is removed on drop.
pub struct FileDb {
    pub db: DatabaseConnection,
    path: PathBuf,
}

impl FileDb {
    pub async fn open(connections: u32) -> Result<Self, anyhow::Error> {
        let path = std::env::temp_dir().join(format!("regrets-test-{}.db", uuid::Uuid::new_v4()));
        let cfg = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            max_connections: connections,
            min_connections: 1,
            ..DatabaseConfig::default()
        };
        let db = models::db::connect_and_migrate(&cfg).await?;
        Ok(Self { db, path })
    }

    pub fn stack(&self) -> (Arc<SeaOrmEntryRepository>, Arc<SeaOrmUpvoteLedger>) {
        (
            Arc::new(SeaOrmEntryRepository { db: self.db.clone() }),
            Arc::new(SeaOrmUpvoteLedger { db: self.db.clone() }),
        )
    }
}

impl Drop for FileDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut p = self.path.clone().into_os_string();
            p.push(suffix);
            let _ = std::fs::remove_file(p);
        }
    }
}

pub async fn seaorm_stack() -> Result<(Arc<SeaOrmEntryRepository>, Arc<SeaOrmUpvoteLedger>), anyhow::Error> {
    let db = get_db().await?;
    Ok((
        Arc::new(SeaOrmEntryRepository { db: db.clone() }),
        Arc::new(SeaOrmUpvoteLedger { db }),
    ))
}
