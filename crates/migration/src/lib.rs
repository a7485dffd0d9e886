//! Migrator registering entity-specific migrations in dependency order.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_entry;
mod m20240301_000002_create_session_upvote;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_entry::Migration),
            // References entry; must run after it
            Box::new(m20240301_000002_create_session_upvote::Migration),
        ]
    }
}
