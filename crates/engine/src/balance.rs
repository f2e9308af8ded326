//! Balance updates and ledger history

use crate::session::Session;
use earnin_core::{BalanceUpdate, LedgerEntry, LedgerKind, Result};
use earnin_persistence::{sqlite, Database};
use tracing::{debug, instrument, warn};

/// Ledger entries shown in the history view when no limit is given
pub const DEFAULT_HISTORY_LIMIT: u32 = 30;

/// Apply a signed `delta` to an account and append its ledger entry.
///
/// The store increments its own balance, so `known_balance` is only the
/// caller's view of it; a mismatch is logged and otherwise ignored.
#[instrument(skip(db, kind, description), fields(kind = %kind))]
pub async fn credit_or_debit(
    db: &Database,
    account_id: &str,
    known_balance: f64,
    delta: f64,
    kind: LedgerKind,
    description: &str,
) -> Result<BalanceUpdate> {
    let update = sqlite::credit_or_debit(db.pool(), account_id, delta, kind, description).await?;

    if (update.previous_balance - known_balance).abs() > f64::EPSILON {
        warn!(
            "Stale balance for {}: caller saw {:.2}, store had {:.2}",
            account_id, known_balance, update.previous_balance
        );
    }

    debug!("{} {:+.2} -> {:.2}", account_id, delta, update.new_balance);
    Ok(update)
}

/// Latest ledger entries for the session's account, newest first
pub async fn recent_history(session: &Session, limit: Option<u32>) -> Result<Vec<LedgerEntry>> {
    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    sqlite::recent_entries(session.db().pool(), session.account_id(), limit).await
}

/// Difference between the stored balance and the sum of the ledger.
/// Zero unless something wrote one without the other.
pub async fn reconcile(session: &Session) -> Result<f64> {
    let account = session.account().await?;
    let sum = sqlite::ledger_sum(session.db().pool(), &account.id).await?;
    let drift = account.balance - sum;

    if drift.abs() > 1e-9 {
        warn!("Ledger drift for {}: balance {:.2}, ledger {:.2}", account.id, account.balance, sum);
    }
    Ok(drift)
}
