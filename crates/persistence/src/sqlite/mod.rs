//! SQLite database management

mod accounts;
mod ads;
mod connection;
mod ledger;
mod mining;
mod referrals;
mod settings;
mod tasks;
mod withdrawals;

pub use accounts::*;
pub use ads::*;
pub use connection::Database;
pub use ledger::*;
pub use mining::*;
pub use referrals::*;
pub use settings::*;
pub use tasks::*;
pub use withdrawals::*;
