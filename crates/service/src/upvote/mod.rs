//! Upvote Guard: at most one upvote per entry per browser session.

pub mod guard;
pub mod ledger;
pub mod session;

pub use guard::UpvoteGuard;
pub use ledger::UpvoteLedger;
pub use session::SessionId;
