//! Live configuration: a watch channel fed by the store and the remote document

use earnin_core::{AppConfig, Result};
use earnin_networking::ConfigClient;
use earnin_persistence::{sqlite, Database};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shared handle to the current config.
///
/// Every clone sees the same value; subscribers are woken on each change.
#[derive(Clone)]
pub struct ConfigHandle {
    tx: Arc<watch::Sender<AppConfig>>,
    db: Option<Database>,
}

impl ConfigHandle {
    /// In-memory handle (nothing is persisted)
    pub fn new(initial: AppConfig) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx: Arc::new(tx),
            db: None,
        }
    }

    /// Handle backed by the settings table: starts from the stored document
    /// (or defaults) and persists every change.
    pub async fn load(db: Database) -> Result<Self> {
        let initial = sqlite::load_config(db.pool()).await?.unwrap_or_default();
        let (tx, _rx) = watch::channel(initial);
        Ok(Self {
            tx: Arc::new(tx),
            db: Some(db),
        })
    }

    /// Snapshot of the current config
    pub fn current(&self) -> AppConfig {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppConfig> {
        self.tx.subscribe()
    }

    /// Merge a (partial) config document over the current config.
    /// Subscribers are only notified when something actually changed.
    pub async fn apply_patch(&self, patch: &serde_json::Value) -> Result<AppConfig> {
        let current = self.current();
        let merged = current.merged_with(patch)?;

        if merged == current {
            debug!("Config patch changed nothing");
            return Ok(merged);
        }

        self.replace(merged.clone()).await?;
        Ok(merged)
    }

    /// Replace the whole config
    pub async fn replace(&self, config: AppConfig) -> Result<()> {
        if let Some(db) = &self.db {
            sqlite::save_config(db.pool(), &config).await?;
        }
        self.tx.send_replace(config);
        info!("Config updated");
        Ok(())
    }
}

/// Handle to stop the config sync loop
#[derive(Clone)]
pub struct ConfigSyncHandle {
    cancel: CancellationToken,
}

impl ConfigSyncHandle {
    pub fn stop(&self) {
        self.cancel.cancel();
        info!("Config sync stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Poll the remote config document every `every` and apply it.
/// Fetch failures are logged and retried on the next tick.
pub fn spawn_config_sync(client: ConfigClient, handle: ConfigHandle, every: Duration) -> ConfigSyncHandle {
    let cancel = CancellationToken::new();
    tokio::spawn(config_sync_loop(client, handle, every, cancel.clone()));
    ConfigSyncHandle { cancel }
}

async fn config_sync_loop(
    client: ConfigClient,
    handle: ConfigHandle,
    every: Duration,
    cancel: CancellationToken,
) {
    info!("Config sync started for {}", client.url());
    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Config sync cancelled, exiting");
                return;
            }
            _ = interval.tick() => {
                let fetched = tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("Config sync cancelled during fetch, exiting");
                        return;
                    }
                    fetched = client.fetch_document() => fetched,
                };

                let document = match fetched {
                    Ok(d) => d,
                    Err(e) => {
                        warn!("Config sync: fetch failed: {}", e);
                        continue;
                    }
                };

                if let Err(e) = handle.apply_patch(&document).await {
                    warn!("Config sync: could not apply document: {}", e);
                }
            }
        }
    }
}
