//! Withdrawal request models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Review state of a withdrawal. Only `Pending` is ever written here;
/// the other transitions belong to the payout reviewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Approved => "approved",
            WithdrawalStatus::Rejected => "rejected",
            WithdrawalStatus::Completed => "completed",
        }
    }
}

impl FromStr for WithdrawalStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WithdrawalStatus::Pending),
            "approved" => Ok(WithdrawalStatus::Approved),
            "rejected" => Ok(WithdrawalStatus::Rejected),
            "completed" => Ok(WithdrawalStatus::Completed),
            other => Err(crate::Error::InvalidData(format!("unknown withdrawal status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub id: i64,
    pub account_id: String,
    pub account_name: String,
    pub account_email: String,
    pub amount: f64,
    pub method: String,
    /// Receiver details (wallet number, address, ...)
    pub details: String,
    pub status: WithdrawalStatus,
    pub timestamp: DateTime<Utc>,
}
