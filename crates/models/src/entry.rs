use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub why: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub regret: Option<String>,
    pub upvotes: i32,
    pub created: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { SessionUpvote }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::SessionUpvote => Entity::has_many(crate::session_upvote::Entity).into(),
        }
    }
}

impl Related<crate::session_upvote::Entity> for Entity {
    fn to() -> RelationDef { Relation::SessionUpvote.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim an optional form value; blank input collapses to `None`.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn validate_why(why: &str) -> Result<String, errors::ModelError> {
    normalize_text(Some(why)).ok_or_else(|| errors::ModelError::Validation("why must not be empty".into()))
}

/// Insert a new entry with `upvotes = 0` and `created = now`.
/// `why` must be non-blank; both fields are stored trimmed.
pub async fn create<C: ConnectionTrait>(db: &C, why: &str, regret: Option<&str>) -> Result<Model, errors::ModelError> {
    let why = validate_why(why)?;
    let am = ActiveModel {
        why: Set(why),
        regret: Set(normalize_text(regret)),
        upvotes: Set(0),
        created: Set(Utc::now()),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::db)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(errors::ModelError::db)
}

/// Newest first; equal timestamps fall back to the higher id.
pub async fn list_by_recency<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_desc(Column::Created)
        .order_by_desc(Column::Id)
        .all(db)
        .await
        .map_err(errors::ModelError::db)
}

/// Most upvoted first; ties resolved newest first.
pub async fn list_by_popularity<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_desc(Column::Upvotes)
        .order_by_desc(Column::Created)
        .order_by_desc(Column::Id)
        .all(db)
        .await
        .map_err(errors::ModelError::db)
}

/// `UPDATE entry SET upvotes = upvotes + 1 WHERE id = ?`.
/// Returns false when no entry has that id.
pub async fn increment_upvotes<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Upvotes, Expr::col(Column::Upvotes).add(1))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(errors::ModelError::db)?;
    Ok(res.rows_affected > 0)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, errors::ModelError> {
    Entity::find().count(db).await.map_err(errors::ModelError::db)
}
