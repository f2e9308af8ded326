//! Account models

use crate::types::Locale;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum username length after cleaning
pub const MIN_USERNAME_LEN: usize = 3;

/// Referral state of an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralState {
    /// Own invite code (the account name)
    pub referral_code: String,
    #[serde(default)]
    pub referral_count: u32,
    #[serde(default)]
    pub referral_earnings: f64,
    /// Account id of the referrer. Set at most once.
    #[serde(default)]
    pub referred_by: Option<String>,
}

/// One user's reward record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub balance: f64,
    /// Unix seconds at which the current mining interval started
    pub mining_start: i64,
    #[serde(default)]
    pub daily_ad_count: u32,
    #[serde(default)]
    pub language: Locale,
    #[serde(default)]
    pub is_blocked: bool,
    pub referral: ReferralState,
    #[serde(default)]
    pub completed_task_ids: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn has_completed(&self, task_id: &str) -> bool {
        self.completed_task_ids.contains(task_id)
    }
}

/// Lowercase and strip a requested username down to `[a-z0-9]`
pub fn clean_username(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Normalize a typed-in referral code the way codes are stored
pub fn normalize_referral_code(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_username() {
        assert_eq!(clean_username("John_Doe 42!"), "johndoe42");
        assert_eq!(clean_username("  "), "");
        assert_eq!(clean_username("ÄBC"), "bc");
    }

    #[test]
    fn test_normalize_referral_code() {
        assert_eq!(normalize_referral_code("  Alice99 "), "alice99");
    }
}
