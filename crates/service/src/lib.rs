//! Service layer for the regrets board.
//! - `entry`: the Entry Store (list, fetch, create, upvote counter).
//! - `upvote`: the per-session Upvote Guard.
//! - Repository traits keep business rules independent of SeaORM.

pub mod errors;
pub mod entry;
pub mod upvote;
#[cfg(test)]
pub mod test_support;
