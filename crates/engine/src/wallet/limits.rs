//! Withdrawal limits

use earnin_core::AppConfig;
use thiserror::Error;

/// Check a withdrawal request against the configured limits and the
/// current balance
pub fn check_withdrawal_allowed(
    config: &AppConfig,
    balance: f64,
    amount: f64,
    method: &str,
    details: &str,
) -> Result<(), WithdrawalViolation> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(WithdrawalViolation::InvalidAmount { requested: amount });
    }

    if amount < config.min_withdrawal {
        return Err(WithdrawalViolation::BelowMinimum {
            requested: amount,
            minimum: config.min_withdrawal,
        });
    }

    if amount > balance {
        return Err(WithdrawalViolation::ExceedsBalance {
            requested: amount,
            available: balance,
        });
    }

    if config.payment_method(method).is_none() {
        return Err(WithdrawalViolation::UnknownMethod(method.to_string()));
    }

    if details.trim().is_empty() {
        return Err(WithdrawalViolation::MissingDetails);
    }

    Ok(())
}

/// Withdrawal limit violation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WithdrawalViolation {
    #[error("amount {requested} is not a positive number")]
    InvalidAmount { requested: f64 },

    #[error("minimum withdrawal is {minimum}, requested {requested}")]
    BelowMinimum { requested: f64, minimum: f64 },

    #[error("requested {requested} but only {available} available")]
    ExceedsBalance { requested: f64, available: f64 },

    #[error("unknown payment method '{0}'")]
    UnknownMethod(String),

    #[error("receiver details are required")]
    MissingDetails,
}
