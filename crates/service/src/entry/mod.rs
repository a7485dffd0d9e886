//! Entry Store: persistence and retrieval of why/regret entries.

pub mod repository;
pub mod service;

pub use models::entry::Model as Entry;
