//! Sponsored-ad rewards

use crate::session::Session;
use earnin_core::{BalanceUpdate, Result};
use earnin_persistence::sqlite;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// How long an ad may take before the reward flow moves on without it
pub const AD_TIMEOUT: Duration = Duration::from_secs(2);

/// Something that can put an ad in front of the user
pub trait AdUnit: Send + Sync {
    fn show(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Ad unit for builds without an ad network
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdUnit;

impl AdUnit for NoAdUnit {
    async fn show(&self) -> Result<()> {
        Ok(())
    }
}

/// Show an ad, giving up after `timeout`. Returns whether it was shown.
pub async fn show_ad_with_timeout(ad: &impl AdUnit, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, ad.show()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("Ad failed: {}", e);
            false
        }
        Err(_) => {
            warn!("Ad timed out after {:?}", timeout);
            false
        }
    }
}

/// Show an ad (best effort) and pay the ad reward
#[instrument(skip(session, ad), fields(account = %session.account_id()))]
pub async fn watch_ad(session: &Session, ad: &impl AdUnit) -> Result<BalanceUpdate> {
    watch_ad_within(session, ad, AD_TIMEOUT).await
}

async fn watch_ad_within(session: &Session, ad: &impl AdUnit, timeout: Duration) -> Result<BalanceUpdate> {
    let account = session.active_account().await?;

    let shown = show_ad_with_timeout(ad, timeout).await;
    debug!("Ad shown: {}", shown);

    let reward = session.config().ad_watch_reward;
    let update = sqlite::record_ad_watch(session.db().pool(), &account.id, reward).await?;
    info!("Ad reward {:.2} paid", reward);
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::session;
    use earnin_core::Error;

    struct BrokenAd;

    impl AdUnit for BrokenAd {
        async fn show(&self) -> Result<()> {
            Err(Error::NetworkError("no fill".to_string()))
        }
    }

    struct SlowAd;

    impl AdUnit for SlowAd {
        async fn show(&self) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_ad_reward_paid() {
        let (session, _) = session().await;

        let update = watch_ad(&session, &NoAdUnit).await.unwrap();
        assert_eq!(update.new_balance, 10.0);
        watch_ad(&session, &NoAdUnit).await.unwrap();

        let account = session.account().await.unwrap();
        assert_eq!(account.balance, 20.0);
        assert_eq!(account.daily_ad_count, 2);
    }

    #[tokio::test]
    async fn test_ad_failures_do_not_block_reward() {
        let (session, _) = session().await;
        assert!(!show_ad_with_timeout(&BrokenAd, AD_TIMEOUT).await);
        assert!(!show_ad_with_timeout(&SlowAd, Duration::from_millis(20)).await);

        watch_ad(&session, &BrokenAd).await.unwrap();
        watch_ad_within(&session, &SlowAd, Duration::from_millis(20)).await.unwrap();
        assert_eq!(session.account().await.unwrap().balance, 20.0);
    }

    #[tokio::test]
    async fn test_blocked_account_earns_nothing() {
        let (session, _) = session().await;
        sqlite::set_blocked(session.db().pool(), "u1", true).await.unwrap();
        assert!(matches!(watch_ad(&session, &NoAdUnit).await, Err(Error::AccountBlocked(_))));
    }
}
