//! Withdrawals and payout estimates

mod limits;

pub use limits::{check_withdrawal_allowed, WithdrawalViolation};

use crate::session::Session;
use earnin_core::{AppConfig, Error, Result, WithdrawalRequest};
use earnin_persistence::sqlite;
use tracing::{info, instrument, warn};

/// Validate and file a withdrawal, debiting the amount right away
#[instrument(skip(session, details), fields(account = %session.account_id()))]
pub async fn request_withdrawal(
    session: &Session,
    amount: f64,
    method: &str,
    details: &str,
) -> Result<WithdrawalRequest> {
    let account = session.active_account().await?;
    let config = session.config();
    let details = details.trim();

    if let Err(violation) = check_withdrawal_allowed(&config, account.balance, amount, method, details) {
        warn!("Withdrawal rejected: {}", violation);
        return Err(Error::InvalidWithdrawal(violation.to_string()));
    }

    let (request, update) =
        sqlite::create_withdrawal(session.db().pool(), &account.id, amount, method, details).await?;
    info!(
        "Withdrawal #{} of {:.2} via {} filed, balance now {:.2}",
        request.id, amount, method, update.new_balance
    );
    Ok(request)
}

/// The session's withdrawals, newest first
pub async fn list_withdrawals(session: &Session) -> Result<Vec<WithdrawalRequest>> {
    sqlite::list_withdrawals(session.db().pool(), session.account_id()).await
}

/// Value of `balance` coins in BDT at the configured rate
pub fn estimated_payout(config: &AppConfig, balance: f64) -> f64 {
    if config.coin_value_coins <= 0.0 {
        return 0.0;
    }
    balance / config.coin_value_coins * config.coin_value_bdt
}

/// How far `balance` is towards the minimum withdrawal, 0.0 ..= 1.0
pub fn withdrawal_progress(config: &AppConfig, balance: f64) -> f64 {
    if config.min_withdrawal <= 0.0 {
        return 1.0;
    }
    (balance / config.min_withdrawal).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::{credit_or_debit, reconcile};
    use crate::session::test_support::session;
    use earnin_core::{LedgerKind, WithdrawalStatus};

    #[test]
    fn test_payout_estimates() {
        let config = AppConfig::default();
        assert_eq!(estimated_payout(&config, 1500.0), 15.0);
        assert_eq!(withdrawal_progress(&config, 500.0), 0.5);
        assert_eq!(withdrawal_progress(&config, 2500.0), 1.0);

        let free = AppConfig {
            min_withdrawal: 0.0,
            coin_value_coins: 0.0,
            ..AppConfig::default()
        };
        assert_eq!(withdrawal_progress(&free, 0.0), 1.0);
        assert_eq!(estimated_payout(&free, 100.0), 0.0);
    }

    #[tokio::test]
    async fn test_withdrawal_debits_and_lists() {
        let (session, _) = session().await;
        credit_or_debit(session.db(), "u1", 0.0, 2500.0, LedgerKind::TaskComplete, "seed")
            .await
            .unwrap();

        let first = request_withdrawal(&session, 1000.0, "bKash", " 01700000000 ").await.unwrap();
        assert_eq!(first.status, WithdrawalStatus::Pending);
        assert_eq!(first.details, "01700000000");
        assert_eq!(first.account_name, "alice");
        let second = request_withdrawal(&session, 1200.0, "Nagad", "01800000000").await.unwrap();

        let account = session.account().await.unwrap();
        assert_eq!(account.balance, 300.0);
        assert_eq!(reconcile(&session).await.unwrap(), 0.0);

        let history = crate::balance::recent_history(&session, None).await.unwrap();
        assert_eq!(history[0].description, "Payout: Nagad");
        assert_eq!(history[0].amount, -1200.0);

        let listed: Vec<i64> = list_withdrawals(&session).await.unwrap().iter().map(|w| w.id).collect();
        assert_eq!(listed, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_rejected_withdrawal_changes_nothing() {
        let (session, _) = session().await;
        credit_or_debit(session.db(), "u1", 0.0, 800.0, LedgerKind::TaskComplete, "seed")
            .await
            .unwrap();

        let err = request_withdrawal(&session, 1000.0, "bKash", "017").await.unwrap_err();
        assert!(matches!(err, Error::InvalidWithdrawal(_)));

        assert_eq!(session.account().await.unwrap().balance, 800.0);
        assert!(list_withdrawals(&session).await.unwrap().is_empty());
    }
}
