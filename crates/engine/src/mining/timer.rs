//! Countdown to the end of a mining interval

use crate::clock::Clock;
use earnin_core::{MiningConfig, UserAccount};
use std::time::Duration;
use tracing::debug;

/// When the current interval becomes claimable.
///
/// Always derived from the stored start timestamp, never from a ticking
/// counter, so it survives restarts and clock jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningTimer {
    start: i64,
    duration_secs: i64,
}

impl MiningTimer {
    pub fn new(start: i64, duration_secs: i64) -> Self {
        Self {
            start,
            duration_secs: duration_secs.max(0),
        }
    }

    pub fn from_account(account: &UserAccount, mining: &MiningConfig) -> Self {
        Self::new(account.mining_start, mining.mining_duration)
    }

    /// Unix seconds at which the interval can be claimed
    pub fn claimable_at(&self) -> i64 {
        self.start.saturating_add(self.duration_secs)
    }

    pub fn remaining(&self, now: i64) -> Duration {
        let secs = self.claimable_at().saturating_sub(now).max(0);
        Duration::from_secs(secs as u64)
    }

    /// Sleep until the interval is claimable (returns at once if it already is)
    pub async fn wait_until_claimable(&self, clock: &dyn Clock) {
        let remaining = self.remaining(clock.now());
        if !remaining.is_zero() {
            debug!("Mining claimable in {}s", remaining.as_secs());
            tokio::time::sleep(remaining).await;
        }
    }
}
