//! Completed-task records and at-most-once task payouts

use chrono::Utc;
use earnin_core::{BalanceUpdate, Error, LedgerKind, Result};
use sqlx::SqlitePool;
use std::collections::BTreeSet;

use super::ledger::apply_delta;

/// Every task id an account has been paid for
pub async fn completed_task_ids(pool: &SqlitePool, account_id: &str) -> Result<BTreeSet<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT task_id FROM completed_tasks WHERE account_id = ? ORDER BY task_id",
    )
    .bind(account_id)
    .fetch_all(pool)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Pay `reward` for `task_id` unless the account already has it recorded.
///
/// Recording the id, crediting the balance and appending the ledger entry
/// share one transaction. Returns `None` when the task was already done,
/// in which case nothing is written.
pub async fn complete_task_once(
    pool: &SqlitePool,
    account_id: &str,
    task_id: &str,
    reward: f64,
    kind: LedgerKind,
    description: &str,
) -> Result<Option<BalanceUpdate>> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM accounts WHERE id = ?")
        .bind(account_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;
    if exists.is_none() {
        return Err(Error::AccountNotFound(account_id.to_string()));
    }

    let inserted = sqlx::query(
        r#"
        INSERT INTO completed_tasks (account_id, task_id, completed_at)
        VALUES (?, ?, ?)
        ON CONFLICT(account_id, task_id) DO NOTHING
        "#,
    )
    .bind(account_id)
    .bind(task_id)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    if inserted.rows_affected() == 0 {
        tx.rollback()
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;
        return Ok(None);
    }

    let update = apply_delta(&mut *tx, account_id, reward, kind, description).await?;

    tx.commit()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(Some(update))
}
