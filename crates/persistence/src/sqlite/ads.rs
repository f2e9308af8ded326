//! Ad-watch rewards

use earnin_core::{BalanceUpdate, Error, LedgerKind, Result};
use sqlx::SqlitePool;

use super::ledger::apply_delta;

/// Credit an ad reward and bump the account's ad counter in one transaction
pub async fn record_ad_watch(pool: &SqlitePool, account_id: &str, reward: f64) -> Result<BalanceUpdate> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    let update = apply_delta(&mut *tx, account_id, reward, LedgerKind::AdReward, "Watched sponsored ad").await?;

    sqlx::query("UPDATE accounts SET daily_ad_count = daily_ad_count + 1 WHERE id = ?")
        .bind(account_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(update)
}
