//! Mining accrual and claims
//!
//! An interval starts at the account's `mining_start` and accrues linearly
//! until `mining_duration` seconds have passed. The state is recomputed from
//! timestamps on every observation.

mod timer;

pub use timer::MiningTimer;

use crate::session::Session;
use earnin_core::{BalanceUpdate, Error, Result};
use earnin_persistence::sqlite;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Where an interval stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MiningPhase {
    Accruing,
    Claimable,
}

/// Point-in-time view of a mining interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningSnapshot {
    pub accrued_amount: f64,
    /// 0.0 ..= 1.0
    pub progress_fraction: f64,
    pub is_claimable: bool,
    pub elapsed_secs: i64,
    pub remaining_secs: i64,
}

impl MiningSnapshot {
    pub fn phase(&self) -> MiningPhase {
        if self.is_claimable {
            MiningPhase::Claimable
        } else {
            MiningPhase::Accruing
        }
    }
}

/// Compute the mining state at `now` for an interval that began at `start`.
///
/// Elapsed time is clamped to `0..=duration_secs`, so accrual stops at the
/// full interval's worth and a clock behind `start` reads as zero.
pub fn compute_mining_state(start: i64, now: i64, duration_secs: i64, rate_per_hour: f64) -> MiningSnapshot {
    let duration = duration_secs.max(0);
    let elapsed = now.saturating_sub(start).max(0);
    let capped = elapsed.min(duration);

    let progress_fraction = if duration == 0 {
        1.0
    } else {
        capped as f64 / duration as f64
    };

    MiningSnapshot {
        accrued_amount: capped as f64 * rate_per_hour / 3600.0,
        progress_fraction,
        is_claimable: elapsed >= duration,
        elapsed_secs: elapsed,
        remaining_secs: duration - capped,
    }
}

/// Mining state of the session's account right now
pub async fn mining_status(session: &Session) -> Result<MiningSnapshot> {
    let account = session.account().await?;
    let mining = session.config().mining_config;
    Ok(compute_mining_state(
        account.mining_start,
        session.now(),
        mining.mining_duration,
        mining.base_points_per_hour,
    ))
}

/// Claim a finished interval and start the next one.
///
/// Fails with `MiningNotClaimable` before the interval is over, or when
/// another session claimed the same interval first.
#[instrument(skip(session), fields(account = %session.account_id()))]
pub async fn claim_mining(session: &Session) -> Result<BalanceUpdate> {
    let account = session.active_account().await?;
    let mining = session.config().mining_config;
    let now = session.now();

    let snapshot = compute_mining_state(
        account.mining_start,
        now,
        mining.mining_duration,
        mining.base_points_per_hour,
    );
    if !snapshot.is_claimable {
        return Err(Error::MiningNotClaimable {
            remaining_secs: snapshot.remaining_secs,
        });
    }

    let reward = snapshot.accrued_amount;
    match sqlite::claim_mining_reward(session.db().pool(), &account.id, account.mining_start, now, reward).await? {
        Some(update) => {
            info!("Mining claimed {:.2}", reward);
            Ok(update)
        }
        None => {
            warn!("Mining interval already claimed by another session");
            let fresh = session.account().await?;
            let timer = MiningTimer::from_account(&fresh, &mining);
            Err(Error::MiningNotClaimable {
                remaining_secs: timer.remaining(now).as_secs() as i64,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::{session_with, START};
    use earnin_core::{AppConfig, LedgerKind, MiningConfig};

    fn hourly_config() -> AppConfig {
        AppConfig {
            mining_config: MiningConfig {
                mining_duration: 3600,
                base_points_per_hour: 360.0,
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_accrual_is_linear_then_capped() {
        let half = compute_mining_state(0, 1800, 3600, 360.0);
        assert_eq!(half.accrued_amount, 180.0);
        assert_eq!(half.progress_fraction, 0.5);
        assert!(!half.is_claimable);
        assert_eq!(half.phase(), MiningPhase::Accruing);
        assert_eq!(half.remaining_secs, 1800);

        let full = compute_mining_state(0, 3600, 3600, 360.0);
        assert_eq!(full.accrued_amount, 360.0);
        assert!(full.is_claimable);
        assert_eq!(full.phase(), MiningPhase::Claimable);

        let late = compute_mining_state(0, 10_000, 3600, 360.0);
        assert_eq!(late.accrued_amount, full.accrued_amount);
        assert_eq!(late.progress_fraction, 1.0);
        assert_eq!(late.remaining_secs, 0);
    }

    #[test]
    fn test_claimable_boundary() {
        assert!(!compute_mining_state(100, 100 + 3599, 3600, 50.0).is_claimable);
        assert!(compute_mining_state(100, 100 + 3600, 3600, 50.0).is_claimable);
    }

    #[test]
    fn test_clock_skew_reads_as_zero() {
        let snapshot = compute_mining_state(5_000, 4_000, 3600, 360.0);
        assert_eq!(snapshot.accrued_amount, 0.0);
        assert_eq!(snapshot.progress_fraction, 0.0);
        assert_eq!(snapshot.elapsed_secs, 0);
        assert!(!snapshot.is_claimable);
    }

    #[test]
    fn test_zero_duration_always_claimable() {
        let snapshot = compute_mining_state(1_000, 1_000, 0, 360.0);
        assert!(snapshot.is_claimable);
        assert_eq!(snapshot.progress_fraction, 1.0);
        assert_eq!(snapshot.accrued_amount, 0.0);
    }

    #[tokio::test]
    async fn test_claim_cycle() {
        let (session, clock) = session_with(hourly_config()).await;

        clock.advance(1800);
        let status = mining_status(&session).await.unwrap();
        assert_eq!(status.accrued_amount, 180.0);
        assert!(matches!(
            claim_mining(&session).await,
            Err(Error::MiningNotClaimable { remaining_secs: 1800 })
        ));

        clock.advance(1800);
        let update = claim_mining(&session).await.unwrap();
        assert_eq!(update.delta, 360.0);
        assert_eq!(update.new_balance, 360.0);

        let account = session.account().await.unwrap();
        assert_eq!(account.mining_start, START + 3600);
        assert_eq!(account.balance, 360.0);

        let history = crate::balance::recent_history(&session, None).await.unwrap();
        assert_eq!(history[0].kind, LedgerKind::MiningClaim);

        // Fresh interval
        let status = mining_status(&session).await.unwrap();
        assert_eq!(status.accrued_amount, 0.0);
        assert!(!status.is_claimable);
    }

    #[tokio::test]
    async fn test_double_claim_pays_once() {
        let (session, clock) = session_with(hourly_config()).await;
        let other = session.clone();
        clock.advance(4000);

        let (a, b) = tokio::join!(claim_mining(&session), claim_mining(&other));
        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(Error::MiningNotClaimable { .. }))));
        assert_eq!(session.account().await.unwrap().balance, 360.0);
    }
}
