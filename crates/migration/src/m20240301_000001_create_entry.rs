//! Create `entry` table.
//! Stores why/regret submissions with their upvote counter.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entry::Table)
                    .if_not_exists()
                    .col(pk_auto(Entry::Id))
                    .col(text(Entry::Why))
                    .col(text_null(Entry::Regret))
                    .col(integer(Entry::Upvotes).default(0))
                    .col(timestamp_with_time_zone(Entry::Created))
                    .to_owned(),
            )
            .await?;

        // Backs the two list orders
        manager
            .create_index(
                Index::create()
                    .name("idx_entry_created")
                    .table(Entry::Table)
                    .col(Entry::Created)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_entry_upvotes")
                    .table(Entry::Table)
                    .col(Entry::Upvotes)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Entry::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Entry {
    Table,
    Id,
    Why,
    Regret,
    Upvotes,
    Created,
}
