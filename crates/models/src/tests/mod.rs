
/// Session upvote ledger rows
pub mod session_upvote_tests;

use anyhow::Result;
use configs::DatabaseConfig;
use sea_orm::DatabaseConnection;

/// Fresh in-memory database with migrations applied.
pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    crate::db::connect_and_migrate(&DatabaseConfig::in_memory_sqlite()).await
}
