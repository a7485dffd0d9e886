pub mod errors;
pub mod db;
pub mod entry;
pub mod session_upvote;

#[cfg(test)]
mod tests;
