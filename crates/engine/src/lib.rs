//! Earnin Engine - Reward operations: balance updates, tasks, mining, referrals and withdrawals

pub mod accounts;
pub mod ads;
pub mod app;
pub mod balance;
pub mod clock;
pub mod config;
pub mod logging;
pub mod mining;
pub mod referral;
pub mod session;
pub mod tasks;
pub mod wallet;

pub use app::Rewards;
pub use balance::credit_or_debit;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{spawn_config_sync, ConfigHandle, ConfigSyncHandle};
pub use mining::{compute_mining_state, MiningSnapshot, MiningTimer};
pub use session::Session;
pub use tasks::is_task_completed;
