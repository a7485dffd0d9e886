use sea_orm::{entity::prelude::*, sea_query::OnConflict, ConnectionTrait, QueryOrder, QuerySelect, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{entry, errors};

/// One upvote cast by one browser session.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session_upvote")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub entry_id: i32,
    pub created: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Entry }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Entry => Entity::belongs_to(entry::Entity)
                .from(Column::EntryId)
                .to(entry::Column::Id)
                .into(),
        }
    }
}

impl Related<entry::Entity> for Entity {
    fn to() -> RelationDef { Relation::Entry.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert `(session_id, entry_id)` unless it is already there.
/// Returns true only for the call that actually inserted the row, so two
/// concurrent callers for the same pair cannot both see `true`.
pub async fn record<C: ConnectionTrait>(db: &C, session_id: &str, entry_id: i32) -> Result<bool, errors::ModelError> {
    if session_id.is_empty() {
        return Err(errors::ModelError::Validation("session_id required".into()));
    }
    let am = ActiveModel {
        session_id: Set(session_id.to_string()),
        entry_id: Set(entry_id),
        created: Set(Utc::now()),
    };
    let inserted = Entity::insert(am)
        .on_conflict(
            OnConflict::columns([Column::SessionId, Column::EntryId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .map_err(errors::ModelError::db)?;
    Ok(inserted > 0)
}

pub async fn contains<C: ConnectionTrait>(db: &C, session_id: &str, entry_id: i32) -> Result<bool, errors::ModelError> {
    let found = Entity::find_by_id((session_id.to_string(), entry_id))
        .one(db)
        .await
        .map_err(errors::ModelError::db)?;
    Ok(found.is_some())
}

/// Entry ids upvoted by a session, oldest vote first.
pub async fn entry_ids_for<C: ConnectionTrait>(db: &C, session_id: &str) -> Result<Vec<i32>, errors::ModelError> {
    Entity::find()
        .select_only()
        .column(Column::EntryId)
        .filter(Column::SessionId.eq(session_id))
        .order_by_asc(Column::Created)
        .order_by_asc(Column::EntryId)
        .into_tuple::<i32>()
        .all(db)
        .await
        .map_err(errors::ModelError::db)
}
