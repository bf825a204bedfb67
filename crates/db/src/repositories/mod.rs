//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod brainstorm_repo;
pub mod history_entry_repo;

pub use brainstorm_repo::BrainstormRepo;
pub use history_entry_repo::HistoryEntryRepo;
