//! Earnin Persistence - SQLite store for accounts, ledger, tasks and config

pub mod sqlite;

pub use sqlite::Database;
