//! Withdrawal request persistence

use chrono::{DateTime, Utc};
use earnin_core::{BalanceUpdate, Error, LedgerKind, Result, WithdrawalRequest, WithdrawalStatus};
use sqlx::SqlitePool;

use super::ledger::apply_delta;

/// Withdrawal record stored in database
#[derive(Debug, sqlx::FromRow)]
struct WithdrawalRow {
    id: i64,
    account_id: String,
    account_name: String,
    account_email: String,
    amount: f64,
    method: String,
    details: String,
    status: String,
    timestamp: DateTime<Utc>,
}

impl TryFrom<WithdrawalRow> for WithdrawalRequest {
    type Error = Error;

    fn try_from(row: WithdrawalRow) -> Result<Self> {
        Ok(WithdrawalRequest {
            id: row.id,
            account_id: row.account_id,
            account_name: row.account_name,
            account_email: row.account_email,
            amount: row.amount,
            method: row.method,
            details: row.details,
            status: row.status.parse()?,
            timestamp: row.timestamp,
        })
    }
}

/// Debit `amount` and file a pending withdrawal request, atomically
pub async fn create_withdrawal(
    pool: &SqlitePool,
    account_id: &str,
    amount: f64,
    method: &str,
    details: &str,
) -> Result<(WithdrawalRequest, BalanceUpdate)> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    let owner: Option<(String, String)> = sqlx::query_as("SELECT name, email FROM accounts WHERE id = ?")
        .bind(account_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;
    let (name, email) = owner.ok_or_else(|| Error::AccountNotFound(account_id.to_string()))?;

    let update = apply_delta(
        &mut *tx,
        account_id,
        -amount,
        LedgerKind::Withdrawal,
        &format!("Payout: {}", method),
    )
    .await?;

    let timestamp = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO withdrawals (account_id, account_name, account_email, amount, method, details, status, timestamp)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(account_id)
    .bind(&name)
    .bind(&email)
    .bind(amount)
    .bind(method)
    .bind(details)
    .bind(WithdrawalStatus::Pending.as_str())
    .bind(timestamp)
    .execute(&mut *tx)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    let request = WithdrawalRequest {
        id: result.last_insert_rowid(),
        account_id: account_id.to_string(),
        account_name: name,
        account_email: email,
        amount,
        method: method.to_string(),
        details: details.to_string(),
        status: WithdrawalStatus::Pending,
        timestamp,
    };

    Ok((request, update))
}

/// All withdrawals of an account, newest first
pub async fn list_withdrawals(pool: &SqlitePool, account_id: &str) -> Result<Vec<WithdrawalRequest>> {
    let rows: Vec<WithdrawalRow> = sqlx::query_as(
        r#"
        SELECT id, account_id, account_name, account_email, amount, method, details, status, timestamp
        FROM withdrawals
        WHERE account_id = ?
        ORDER BY timestamp DESC, id DESC
        "#,
    )
    .bind(account_id)
    .fetch_all(pool)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    rows.into_iter().map(WithdrawalRequest::try_from).collect()
}
