//! Data models for accounts, ledger entries, withdrawals and config

mod account;
mod config;
mod ledger;
mod task;
mod withdrawal;

pub use account::*;
pub use config::*;
pub use ledger::*;
pub use task::*;
pub use withdrawal::*;
