//! Create `session_upvote` table.
//! One row per (session, entry) pair that has been upvoted; the composite
//! primary key is what makes a second upvote from the same session fail.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SessionUpvote::Table)
                    .if_not_exists()
                    .col(string_len(SessionUpvote::SessionId, 64))
                    .col(integer(SessionUpvote::EntryId))
                    .col(timestamp_with_time_zone(SessionUpvote::Created))
                    .primary_key(
                        Index::create()
                            .name("pk_session_upvote")
                            .col(SessionUpvote::SessionId)
                            .col(SessionUpvote::EntryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_upvote_entry")
                            .from(SessionUpvote::Table, SessionUpvote::EntryId)
                            .to(Entry::Table, Entry::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SessionUpvote::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SessionUpvote {
    Table,
    SessionId,
    EntryId,
    Created,
}

#[derive(DeriveIden)]
enum Entry { Table, Id }
