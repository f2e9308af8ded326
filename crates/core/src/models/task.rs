//! Reward-bearing task models

use serde::{Deserialize, Serialize};

/// Which task list a task comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    /// Website surfing, paid after the page has been open for `timer` seconds
    Visit,
    Social,
    /// App / mini-app downloads
    Download,
}

/// A task as published in the config document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    pub name: String,
    /// Doubles as the task identifier in the completed set
    pub link: String,
    pub reward: f64,
    /// Seconds the page must stay open (visit tasks)
    #[serde(default)]
    pub timer: Option<u64>,
    #[serde(default)]
    pub is_web: bool,
    #[serde(default)]
    pub is_coming_soon: bool,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>, link: impl Into<String>, reward: f64) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            reward,
            timer: None,
            is_web: false,
            is_coming_soon: false,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.link
    }
}

/// What happened when a task was submitted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum TaskOutcome {
    /// First completion: reward paid and task recorded
    Credited { amount: f64, new_balance: f64 },
    /// Task was already paid out earlier; nothing changed
    AlreadyCompleted,
    /// Zero-reward task; acknowledged without payout or record
    Acknowledged,
    /// Task is not open yet
    Unavailable,
}

impl TaskOutcome {
    pub fn is_credited(&self) -> bool {
        matches!(self, TaskOutcome::Credited { .. })
    }
}
