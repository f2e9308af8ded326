//! Balance updates and the append-only reward ledger

use chrono::{DateTime, Utc};
use earnin_core::{BalanceUpdate, Error, LedgerEntry, LedgerKind, Result};
use sqlx::{SqliteConnection, SqlitePool};

/// Ledger row stored in database
#[derive(Debug, sqlx::FromRow)]
struct LedgerRow {
    id: i64,
    account_id: String,
    amount: f64,
    kind: String,
    description: String,
    timestamp: DateTime<Utc>,
}

impl TryFrom<LedgerRow> for LedgerEntry {
    type Error = Error;

    fn try_from(row: LedgerRow) -> Result<Self> {
        Ok(LedgerEntry {
            id: row.id,
            account_id: row.account_id,
            amount: row.amount,
            kind: row.kind.parse()?,
            description: row.description,
            timestamp: row.timestamp,
        })
    }
}

/// Apply `delta` to an account's stored balance and append the matching
/// ledger entry, on a connection the caller holds a transaction on.
///
/// The balance is incremented in place, never overwritten, and a debit
/// may not take the stored balance below zero.
pub(crate) async fn apply_delta(
    conn: &mut SqliteConnection,
    account_id: &str,
    delta: f64,
    kind: LedgerKind,
    description: &str,
) -> Result<BalanceUpdate> {
    if !delta.is_finite() {
        return Err(Error::InvalidInput(format!("non-finite amount {}", delta)));
    }

    let updated: Option<(f64,)> = sqlx::query_as(
        r#"
        UPDATE accounts
        SET balance = balance + ?1
        WHERE id = ?2 AND (?1 >= 0 OR balance + ?1 >= 0)
        RETURNING balance
        "#,
    )
    .bind(delta)
    .bind(account_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    let new_balance = match updated {
        Some((balance,)) => balance,
        None => {
            let current: Option<(f64,)> =
                sqlx::query_as("SELECT balance FROM accounts WHERE id = ?")
                    .bind(account_id)
                    .fetch_optional(&mut *conn)
                    .await
                    .map_err(|e| Error::DatabaseError(e.to_string()))?;

            return Err(match current {
                Some((available,)) => Error::InsufficientFunds {
                    required: -delta,
                    available,
                },
                None => Error::AccountNotFound(account_id.to_string()),
            });
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO ledger (account_id, amount, kind, description, timestamp)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(account_id)
    .bind(delta)
    .bind(kind.as_str())
    .bind(description)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(BalanceUpdate {
        previous_balance: new_balance - delta,
        new_balance,
        delta,
        entry_id: result.last_insert_rowid(),
    })
}

/// Credit (positive delta) or debit (negative delta) an account.
///
/// The balance change and its ledger entry commit together or not at all.
pub async fn credit_or_debit(
    pool: &SqlitePool,
    account_id: &str,
    delta: f64,
    kind: LedgerKind,
    description: &str,
) -> Result<BalanceUpdate> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    let update = apply_delta(&mut *tx, account_id, delta, kind, description).await?;

    tx.commit()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(update)
}

/// Most recent ledger entries for an account, newest first
pub async fn recent_entries(
    pool: &SqlitePool,
    account_id: &str,
    limit: u32,
) -> Result<Vec<LedgerEntry>> {
    let rows: Vec<LedgerRow> = sqlx::query_as(
        r#"
        SELECT id, account_id, amount, kind, description, timestamp
        FROM ledger
        WHERE account_id = ?
        ORDER BY timestamp DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(account_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    rows.into_iter().map(LedgerEntry::try_from).collect()
}

/// Get ledger entry count for an account
pub async fn count_entries(pool: &SqlitePool, account_id: &str) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ledger WHERE account_id = ?")
        .bind(account_id)
        .fetch_one(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(row.0)
}

/// Sum of every ledger amount for an account
pub async fn ledger_sum(pool: &SqlitePool, account_id: &str) -> Result<f64> {
    let row: (f64,) =
        sqlx::query_as("SELECT COALESCE(SUM(amount), 0.0) FROM ledger WHERE account_id = ?")
            .bind(account_id)
            .fetch_one(pool)
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::{create_account, get_account, NewAccount};
    use crate::Database;

    async fn setup() -> Database {
        let db = Database::connect_in_memory().await.unwrap();
        create_account(db.pool(), &NewAccount::new("uid-1", "alice", "alice@example.com"), 1_000)
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_credit_appends_one_entry() {
        let db = setup().await;

        let update = credit_or_debit(db.pool(), "uid-1", 250.0, LedgerKind::AdReward, "Watched sponsored ad")
            .await
            .unwrap();
        assert_eq!(update.previous_balance, 0.0);
        assert_eq!(update.new_balance, 250.0);

        let entries = recent_entries(db.pool(), "uid-1", 30).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, 250.0);
        assert_eq!(entries[0].kind, LedgerKind::AdReward);
        assert_eq!(entries[0].id, update.entry_id);
    }

    #[tokio::test]
    async fn test_overdraft_leaves_no_trace() {
        let db = setup().await;
        credit_or_debit(db.pool(), "uid-1", 100.0, LedgerKind::TaskComplete, "Follow")
            .await
            .unwrap();

        let err = credit_or_debit(db.pool(), "uid-1", -150.0, LedgerKind::Withdrawal, "Payout: bKash")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientFunds { required, available } if required == 150.0 && available == 100.0
        ));

        let account = get_account(db.pool(), "uid-1").await.unwrap().unwrap();
        assert_eq!(account.balance, 100.0);
        assert_eq!(count_entries(db.pool(), "uid-1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let db = setup().await;
        let err = credit_or_debit(db.pool(), "ghost", 10.0, LedgerKind::AdReward, "")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AccountNotFound(id) if id == "ghost"));
        assert_eq!(count_entries(db.pool(), "ghost").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_balance_matches_ledger_sum() {
        let db = setup().await;
        for delta in [100.0, 40.0, -90.0, 7.5] {
            let kind = if delta < 0.0 { LedgerKind::Withdrawal } else { LedgerKind::TaskComplete };
            credit_or_debit(db.pool(), "uid-1", delta, kind, "").await.unwrap();
        }

        let account = get_account(db.pool(), "uid-1").await.unwrap().unwrap();
        assert_eq!(account.balance, 57.5);
        assert_eq!(ledger_sum(db.pool(), "uid-1").await.unwrap(), 57.5);

        let entries = recent_entries(db.pool(), "uid-1", 2).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].amount, 7.5);
        assert_eq!(entries[1].amount, -90.0);
    }
}
