//! Tunable app parameters published by the operators

use super::task::{TaskCategory, TaskDefinition};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Mining parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MiningConfig {
    /// Length of one mining interval in seconds
    pub mining_duration: i64,
    pub base_points_per_hour: f64,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            mining_duration: 12 * 3600,
            base_points_per_hour: 50.0,
        }
    }
}

/// A payout channel offered on the wallet screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub name: String,
    /// Hint for the receiver details field
    #[serde(default)]
    pub placeholder: String,
}

impl PaymentMethod {
    pub fn new(name: &str, placeholder: &str) -> Self {
        Self {
            name: name.to_string(),
            placeholder: placeholder.to_string(),
        }
    }
}

/// The config document. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub min_withdrawal: f64,
    pub mining_config: MiningConfig,
    pub ad_watch_reward: f64,
    /// Paid to both sides of a redeemed referral
    pub referral_bonus: f64,
    pub payment_methods: Vec<PaymentMethod>,
    pub websites_to_visit: Vec<TaskDefinition>,
    pub social_tasks: Vec<TaskDefinition>,
    pub download_tasks: Vec<TaskDefinition>,
    /// Exchange rate: `coin_value_coins` coins are worth `coin_value_bdt` BDT
    pub coin_value_coins: f64,
    pub coin_value_bdt: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            min_withdrawal: 1000.0,
            mining_config: MiningConfig::default(),
            ad_watch_reward: 10.0,
            referral_bonus: 100.0,
            payment_methods: vec![
                PaymentMethod::new("bKash", "bKash personal number"),
                PaymentMethod::new("Nagad", "Nagad personal number"),
            ],
            websites_to_visit: Vec::new(),
            social_tasks: Vec::new(),
            download_tasks: default_download_tasks(),
            coin_value_coins: 1000.0,
            coin_value_bdt: 10.0,
        }
    }
}

fn default_download_tasks() -> Vec<TaskDefinition> {
    let web_app = TaskDefinition {
        is_web: true,
        ..TaskDefinition::new("Visit Web App", "https://tokenearin-webapp.pages.dev", 100.0)
    };
    let mini_app = TaskDefinition {
        is_web: true,
        ..TaskDefinition::new("Telegram Mini app", "https://t.me/tokenearin_bot", 120.0)
    };
    let apk = TaskDefinition::new("Download APK", "https://example.com/app-apk", 150.0);
    let soon = TaskDefinition {
        is_coming_soon: true,
        ..TaskDefinition::new("APPS COMING SOON", "#", 0.0)
    };
    vec![web_app, mini_app, apk, soon]
}

impl AppConfig {
    /// Tasks published for a category
    pub fn tasks(&self, category: TaskCategory) -> &[TaskDefinition] {
        match category {
            TaskCategory::Visit => &self.websites_to_visit,
            TaskCategory::Social => &self.social_tasks,
            TaskCategory::Download => &self.download_tasks,
        }
    }

    pub fn payment_method(&self, name: &str) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|m| m.name == name)
    }

    /// Shallow-merge a (possibly partial) config document over this config.
    ///
    /// Top-level keys present in `patch` replace the current values wholesale;
    /// absent keys keep their current values.
    pub fn merged_with(&self, patch: &serde_json::Value) -> Result<AppConfig> {
        let patch = patch
            .as_object()
            .ok_or_else(|| Error::InvalidData("config document must be an object".to_string()))?;

        let mut current = serde_json::to_value(self)?;
        if let Some(fields) = current.as_object_mut() {
            for (key, value) in patch {
                fields.insert(key.clone(), value.clone());
            }
        }

        Ok(serde_json::from_value(current)?)
    }
}
