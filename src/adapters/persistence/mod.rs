//! Persistence adapters. Implement the store ports.

pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
