//! Invite codes

use crate::session::Session;
use earnin_core::{normalize_referral_code, Error, Result};
use earnin_persistence::sqlite;
use tracing::{info, instrument};

/// Shareable invite link for `code`
pub fn referral_link(origin: &str, code: &str) -> String {
    format!("{}/?ref={}", origin.trim_end_matches('/'), code)
}

/// Redeem someone else's invite code for the session's account.
///
/// Works once per account. Both sides receive the configured referral
/// bonus; returns the amount credited to the redeemer.
#[instrument(skip(session, raw_code), fields(account = %session.account_id()))]
pub async fn redeem_referral(session: &Session, raw_code: &str) -> Result<f64> {
    let code = normalize_referral_code(raw_code);
    if code.is_empty() {
        return Err(Error::InvalidInput("referral code is empty".to_string()));
    }

    let account = session.active_account().await?;
    let referrer = sqlite::find_by_referral_code(session.db().pool(), &code)
        .await?
        .ok_or_else(|| Error::InvalidReferralCode(code.clone()))?;

    if referrer.id == account.id {
        return Err(Error::SelfReferral);
    }
    if account.referral.referred_by.is_some() {
        return Err(Error::AlreadyReferred);
    }

    let bonus = session.config().referral_bonus;
    if !sqlite::redeem_referral(session.db().pool(), &account.id, &referrer.id, bonus).await? {
        return Err(Error::AlreadyReferred);
    }

    info!("Referral code '{}' redeemed, bonus {:.2}", code, bonus);
    Ok(bonus)
}
