//! Key/value settings, including the persisted config document

use earnin_core::{AppConfig, Error, Result};
use sqlx::SqlitePool;

const CONFIG_KEY: &str = "app_config";

/// Load the last stored config document, if any
pub async fn load_config(pool: &SqlitePool) -> Result<Option<AppConfig>> {
    let json = sqlx::query_scalar::<sqlx::Sqlite, String>("SELECT value FROM settings WHERE key = ?")
        .bind(CONFIG_KEY)
        .fetch_optional(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    match json {
        Some(j) => Ok(Some(serde_json::from_str(&j)?)),
        None => Ok(None),
    }
}

/// Store the config document, replacing the previous one
pub async fn save_config(pool: &SqlitePool, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string(config)?;

    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
        .bind(CONFIG_KEY)
        .bind(&json)
        .execute(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}
