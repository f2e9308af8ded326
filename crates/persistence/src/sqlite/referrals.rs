//! One-shot referral redemption

use earnin_core::{Error, LedgerKind, Result};
use sqlx::SqlitePool;

use super::ledger::apply_delta;

/// Link `account_id` to `referrer_id` and pay `bonus` to both sides.
///
/// `referred_by` is only written while it is still unset; returns `false`
/// (and writes nothing) if the account was already referred.
pub async fn redeem_referral(
    pool: &SqlitePool,
    account_id: &str,
    referrer_id: &str,
    bonus: f64,
) -> Result<bool> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    let linked = sqlx::query(
        "UPDATE accounts SET referred_by = ? WHERE id = ? AND referred_by IS NULL",
    )
    .bind(referrer_id)
    .bind(account_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    if linked.rows_affected() == 0 {
        tx.rollback()
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;
        return Ok(false);
    }

    let counted = sqlx::query(
        r#"
        UPDATE accounts
        SET referral_count = referral_count + 1,
            referral_earnings = referral_earnings + ?
        WHERE id = ?
        "#,
    )
    .bind(bonus.max(0.0))
    .bind(referrer_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    if counted.rows_affected() == 0 {
        return Err(Error::AccountNotFound(referrer_id.to_string()));
    }

    if bonus > 0.0 {
        apply_delta(&mut *tx, account_id, bonus, LedgerKind::ReferralRedeem, "Invite code redeemed").await?;
        apply_delta(&mut *tx, referrer_id, bonus, LedgerKind::ReferralBonus, "Friend joined with your code").await?;
    }

    tx.commit()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(true)
}
