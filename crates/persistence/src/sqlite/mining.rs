//! Mining interval claims

use earnin_core::{BalanceUpdate, Error, LedgerKind, Result};
use sqlx::SqlitePool;

use super::ledger::apply_delta;

/// Credit a mining reward and restart the interval at `now`.
///
/// The restart only happens if the stored start still equals
/// `observed_start`, so an interval is paid at most once even when two
/// sessions claim it. Returns `None` if another claim won.
pub async fn claim_mining_reward(
    pool: &SqlitePool,
    account_id: &str,
    observed_start: i64,
    now: i64,
    amount: f64,
) -> Result<Option<BalanceUpdate>> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    let reset = sqlx::query("UPDATE accounts SET mining_start = ? WHERE id = ? AND mining_start = ?")
        .bind(now)
        .bind(account_id)
        .bind(observed_start)
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    if reset.rows_affected() == 0 {
        tx.rollback()
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;
        return Ok(None);
    }

    let update = apply_delta(&mut *tx, account_id, amount, LedgerKind::MiningClaim, "Mining session reward").await?;

    tx.commit()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(Some(update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::{create_account, get_account, recent_entries, NewAccount};
    use crate::Database;

    #[tokio::test]
    async fn test_claim_resets_start() {
        let db = Database::connect_in_memory().await.unwrap();
        create_account(db.pool(), &NewAccount::new("uid-1", "alice", ""), 1_000)
            .await
            .unwrap();

        let update = claim_mining_reward(db.pool(), "uid-1", 1_000, 4_600, 360.0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update.new_balance, 360.0);

        let account = get_account(db.pool(), "uid-1").await.unwrap().unwrap();
        assert_eq!(account.mining_start, 4_600);

        let entries = recent_entries(db.pool(), "uid-1", 10).await.unwrap();
        assert_eq!(entries[0].kind, LedgerKind::MiningClaim);
        assert_eq!(entries[0].amount, 360.0);
    }

    #[tokio::test]
    async fn test_stale_start_claims_nothing() {
        let db = Database::connect_in_memory().await.unwrap();
        create_account(db.pool(), &NewAccount::new("uid-1", "alice", ""), 1_000)
            .await
            .unwrap();

        claim_mining_reward(db.pool(), "uid-1", 1_000, 4_600, 360.0)
            .await
            .unwrap();
        let again = claim_mining_reward(db.pool(), "uid-1", 1_000, 4_601, 360.0)
            .await
            .unwrap();
        assert!(again.is_none());

        let account = get_account(db.pool(), "uid-1").await.unwrap().unwrap();
        assert_eq!(account.balance, 360.0);
        assert_eq!(account.mining_start, 4_600);
    }
}
