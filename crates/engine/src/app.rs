//! Process-wide wiring: store, live config and the optional config sync

use crate::config::{spawn_config_sync, ConfigHandle, ConfigSyncHandle};
use crate::session::Session;
use earnin_core::Result;
use earnin_networking::ConfigClient;
use earnin_persistence::Database;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// How often the remote config document is polled
pub const CONFIG_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Shared state of a running rewards app. Hand out one `Session` per
/// signed-in account.
pub struct Rewards {
    db: Database,
    config: ConfigHandle,
    sync: Option<ConfigSyncHandle>,
}

impl Rewards {
    /// Open the store at `db_path` and, if `config_url` is given, keep the
    /// config in sync with that document.
    pub async fn open(db_path: &Path, config_url: Option<&str>) -> Result<Self> {
        let db = Database::connect(db_path).await?;
        Self::with_database(db, config_url).await
    }

    pub async fn with_database(db: Database, config_url: Option<&str>) -> Result<Self> {
        let config = ConfigHandle::load(db.clone()).await?;

        let sync = match config_url {
            Some(url) => {
                let client = ConfigClient::new(url)?;
                Some(spawn_config_sync(client, config.clone(), CONFIG_POLL_INTERVAL))
            }
            None => None,
        };

        info!("Rewards ready (config sync: {})", sync.is_some());
        Ok(Self { db, config, sync })
    }

    pub fn session(&self, account_id: &str) -> Session {
        Session::new(account_id, self.db.clone(), self.config.clone())
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Stop background work
    pub fn shutdown(&self) {
        if let Some(sync) = &self.sync {
            sync.stop();
        }
    }
}

impl Drop for Rewards {
    fn drop(&mut self) {
        self.shutdown();
    }
}
