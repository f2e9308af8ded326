//! Per-user context passed to every reward operation

use crate::clock::{Clock, SystemClock};
use crate::config::ConfigHandle;
use earnin_core::{AppConfig, Error, Result, UserAccount};
use earnin_persistence::{sqlite, Database};
use std::sync::Arc;

/// Everything an operation needs to act for one signed-in account:
/// the account id, the store, the live config and a clock.
#[derive(Clone)]
pub struct Session {
    account_id: String,
    db: Database,
    config: ConfigHandle,
    clock: Arc<dyn Clock>,
}

impl Session {
    pub fn new(account_id: impl Into<String>, db: Database, config: ConfigHandle) -> Self {
        Self {
            account_id: account_id.into(),
            db,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use a different clock (tests, replays)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config_handle(&self) -> &ConfigHandle {
        &self.config
    }

    /// Current config snapshot
    pub fn config(&self) -> AppConfig {
        self.config.current()
    }

    /// Unix seconds
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Fresh read of the account record
    pub async fn account(&self) -> Result<UserAccount> {
        sqlite::get_account(self.db.pool(), &self.account_id)
            .await?
            .ok_or_else(|| Error::AccountNotFound(self.account_id.clone()))
    }

    /// Fresh read of the account, refusing blocked accounts
    pub async fn active_account(&self) -> Result<UserAccount> {
        let account = self.account().await?;
        if account.is_blocked {
            return Err(Error::AccountBlocked(account.id));
        }
        Ok(account)
    }
}
