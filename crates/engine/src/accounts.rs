//! Account onboarding and profile settings

use crate::referral::redeem_referral;
use crate::session::Session;
use earnin_core::{clean_username, Error, Locale, Result, UserAccount, MIN_USERNAME_LEN};
use earnin_persistence::sqlite::{self, NewAccount};
use tracing::{info, instrument, warn};

/// Open the session's account.
///
/// The requested name is cleaned to `[a-z0-9]` and doubles as the
/// account's referral code. An invite code, if given, is redeemed right
/// after; a bad invite is logged and does not fail onboarding.
#[instrument(skip(session, email, invite), fields(account = %session.account_id()))]
pub async fn create_account(
    session: &Session,
    raw_name: &str,
    email: &str,
    invite: Option<&str>,
) -> Result<UserAccount> {
    let name = clean_username(raw_name);
    if name.len() < MIN_USERNAME_LEN {
        return Err(Error::InvalidInput(format!(
            "username must have at least {} letters or digits",
            MIN_USERNAME_LEN
        )));
    }

    let new = NewAccount::new(session.account_id(), &name, email.trim());
    sqlite::create_account(session.db().pool(), &new, session.now()).await?;
    info!("Account '{}' created", name);

    if let Some(code) = invite.filter(|c| !c.trim().is_empty()) {
        if let Err(e) = redeem_referral(session, code).await {
            warn!("Invite code '{}' not applied: {}", code.trim(), e);
        }
    }

    session.account().await
}

pub async fn set_language(session: &Session, language: Locale) -> Result<()> {
    sqlite::set_language(session.db().pool(), session.account_id(), language).await
}

/// Store a profile photo URL; only http(s) URLs are accepted
pub async fn set_photo_url(session: &Session, url: &str) -> Result<()> {
    let url = url.trim();
    if !url.starts_with("http") {
        return Err(Error::InvalidInput(format!("not a photo url: '{}'", url)));
    }
    sqlite::set_photo_url(session.db().pool(), session.account_id(), url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::ConfigHandle;
    use earnin_core::AppConfig;
    use earnin_persistence::Database;
    use std::sync::Arc;

    fn blank_session(id: &str, db: Database) -> Session {
        Session::new(id, db, ConfigHandle::new(AppConfig::default())).with_clock(Arc::new(FixedClock::new(42)))
    }

    #[tokio::test]
    async fn test_create_cleans_name() {
        let db = Database::connect_in_memory().await.unwrap();
        let session = blank_session("u1", db);

        let account = create_account(&session, "Alice_99!", " alice@example.com ", None).await.unwrap();
        assert_eq!(account.name, "alice99");
        assert_eq!(account.referral.referral_code, "alice99");
        assert_eq!(account.email, "alice@example.com");
        assert_eq!(account.balance, 0.0);
        assert_eq!(account.mining_start, 42);
        assert_eq!(account.language, Locale::En);
    }

    #[tokio::test]
    async fn test_name_rules() {
        let db = Database::connect_in_memory().await.unwrap();
        let first = blank_session("u1", db.clone());
        let second = blank_session("u2", db);

        assert!(matches!(create_account(&first, "a!b", "", None).await, Err(Error::InvalidInput(_))));
        create_account(&first, "alice", "", None).await.unwrap();
        assert!(matches!(
            create_account(&second, "ALICE", "", None).await,
            Err(Error::UsernameTaken(_))
        ));
    }

    #[tokio::test]
    async fn test_invite_applied_or_ignored() {
        let db = Database::connect_in_memory().await.unwrap();
        let alice = blank_session("u1", db.clone());
        create_account(&alice, "alice", "", None).await.unwrap();

        let bob = blank_session("u2", db.clone());
        let bob_account = create_account(&bob, "bob", "", Some("Alice")).await.unwrap();
        assert_eq!(bob_account.balance, 100.0);
        assert_eq!(bob_account.referral.referred_by.as_deref(), Some("u1"));

        let carol = blank_session("u3", db);
        let carol_account = create_account(&carol, "carol", "", Some("nobody")).await.unwrap();
        assert_eq!(carol_account.balance, 0.0);
        assert_eq!(carol_account.referral.referred_by, None);
    }

    #[tokio::test]
    async fn test_profile_settings() {
        let db = Database::connect_in_memory().await.unwrap();
        let session = blank_session("u1", db);
        create_account(&session, "alice", "", None).await.unwrap();

        set_language(&session, Locale::Bn).await.unwrap();
        set_photo_url(&session, "https://cdn.example.com/a.png").await.unwrap();
        assert!(matches!(
            set_photo_url(&session, "javascript:alert(1)").await,
            Err(Error::InvalidInput(_))
        ));

        let account = session.account().await.unwrap();
        assert_eq!(account.language, Locale::Bn);
        assert_eq!(account.photo_url.as_deref(), Some("https://cdn.example.com/a.png"));
    }
}
