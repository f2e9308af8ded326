//! Reward ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What caused a balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LedgerKind {
    AdReward,
    TaskComplete,
    MiningClaim,
    Withdrawal,
    ReferralBonus,
    ReferralRedeem,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::AdReward => "ad-reward",
            LedgerKind::TaskComplete => "task-complete",
            LedgerKind::MiningClaim => "mining-claim",
            LedgerKind::Withdrawal => "withdrawal",
            LedgerKind::ReferralBonus => "referral-bonus",
            LedgerKind::ReferralRedeem => "referral-redeem",
        }
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ad-reward" => Ok(LedgerKind::AdReward),
            "task-complete" => Ok(LedgerKind::TaskComplete),
            "mining-claim" => Ok(LedgerKind::MiningClaim),
            "withdrawal" => Ok(LedgerKind::Withdrawal),
            "referral-bonus" => Ok(LedgerKind::ReferralBonus),
            "referral-redeem" => Ok(LedgerKind::ReferralRedeem),
            other => Err(crate::Error::InvalidData(format!("unknown ledger kind '{}'", other))),
        }
    }
}

/// Immutable record of one balance change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: i64,
    pub account_id: String,
    /// Signed delta (positive = credit, negative = debit)
    pub amount: f64,
    pub kind: LedgerKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Result of a committed balance update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdate {
    /// Stored balance right before the update
    pub previous_balance: f64,
    pub new_balance: f64,
    pub delta: f64,
    /// Id of the appended ledger entry
    pub entry_id: i64,
}
