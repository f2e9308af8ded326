//! Account CRUD operations

use chrono::{DateTime, Utc};
use earnin_core::{Error, Locale, ReferralState, Result, UserAccount};
use sqlx::sqlite::SqliteQueryResult;
use sqlx::SqlitePool;

use super::tasks::completed_task_ids;

/// Fields needed to open an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: String,
    /// Already-cleaned username; also becomes the referral code
    pub name: String,
    pub email: String,
}

impl NewAccount {
    pub fn new(id: &str, name: &str, email: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

/// Database row for account
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: String,
    name: String,
    email: String,
    photo_url: Option<String>,
    balance: f64,
    mining_start: i64,
    daily_ad_count: i64,
    language: String,
    is_blocked: i32,
    referral_code: String,
    referral_count: i64,
    referral_earnings: f64,
    referred_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for UserAccount {
    fn from(row: AccountRow) -> Self {
        UserAccount {
            id: row.id,
            name: row.name,
            email: row.email,
            photo_url: row.photo_url,
            balance: row.balance,
            mining_start: row.mining_start,
            daily_ad_count: row.daily_ad_count.max(0) as u32,
            language: row.language.parse().unwrap_or_default(),
            is_blocked: row.is_blocked != 0,
            referral: ReferralState {
                referral_code: row.referral_code,
                referral_count: row.referral_count.max(0) as u32,
                referral_earnings: row.referral_earnings,
                referred_by: row.referred_by,
            },
            completed_task_ids: Default::default(),
            created_at: row.created_at,
        }
    }
}

const ACCOUNT_COLUMNS: &str = r#"
    id, name, email, photo_url, balance, mining_start, daily_ad_count, language,
    is_blocked, referral_code, referral_count, referral_earnings, referred_by, created_at
"#;

/// Create a new account with a zero balance and mining started at `now`
pub async fn create_account(pool: &SqlitePool, account: &NewAccount, now: i64) -> Result<()> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM accounts WHERE id = ? OR name = ?")
        .bind(&account.id)
        .bind(&account.name)
        .fetch_optional(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    if let Some((id,)) = existing {
        return Err(if id == account.id {
            Error::InvalidInput(format!("account {} already exists", id))
        } else {
            Error::UsernameTaken(account.name.clone())
        });
    }

    sqlx::query(
        r#"
        INSERT INTO accounts (id, name, email, mining_start, referral_code, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&account.id)
    .bind(&account.name)
    .bind(&account.email)
    .bind(now)
    .bind(&account.name)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Error::UsernameTaken(account.name.clone())
        }
        other => Error::DatabaseError(other.to_string()),
    })?;

    Ok(())
}

/// Get an account with its completed task set
pub async fn get_account(pool: &SqlitePool, id: &str) -> Result<Option<UserAccount>> {
    let row: Option<AccountRow> =
        sqlx::query_as(&format!("SELECT {} FROM accounts WHERE id = ?", ACCOUNT_COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut account = UserAccount::from(row);
    account.completed_task_ids = completed_task_ids(pool, id).await?;
    Ok(Some(account))
}

/// Look up the account owning a referral code
pub async fn find_by_referral_code(pool: &SqlitePool, code: &str) -> Result<Option<UserAccount>> {
    let row: Option<AccountRow> = sqlx::query_as(&format!(
        "SELECT {} FROM accounts WHERE referral_code = ?",
        ACCOUNT_COLUMNS
    ))
    .bind(code)
    .fetch_optional(pool)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(row.map(UserAccount::from))
}

fn expect_one_row(result: SqliteQueryResult, id: &str) -> Result<()> {
    if result.rows_affected() == 0 {
        return Err(Error::AccountNotFound(id.to_string()));
    }
    Ok(())
}

/// Set the UI language
pub async fn set_language(pool: &SqlitePool, id: &str, language: Locale) -> Result<()> {
    let result = sqlx::query("UPDATE accounts SET language = ? WHERE id = ?")
        .bind(language.as_str())
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    expect_one_row(result, id)
}

/// Set the profile picture URL
pub async fn set_photo_url(pool: &SqlitePool, id: &str, url: &str) -> Result<()> {
    let result = sqlx::query("UPDATE accounts SET photo_url = ? WHERE id = ?")
        .bind(url)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    expect_one_row(result, id)
}

/// Block or unblock an account
pub async fn set_blocked(pool: &SqlitePool, id: &str, blocked: bool) -> Result<()> {
    let result = sqlx::query("UPDATE accounts SET is_blocked = ? WHERE id = ?")
        .bind(blocked as i32)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    expect_one_row(result, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::connect_in_memory().await.unwrap();
        create_account(db.pool(), &NewAccount::new("uid-1", "alice", "a@example.com"), 1_700_000_000)
            .await
            .unwrap();

        let account = get_account(db.pool(), "uid-1").await.unwrap().unwrap();
        assert_eq!(account.name, "alice");
        assert_eq!(account.balance, 0.0);
        assert_eq!(account.mining_start, 1_700_000_000);
        assert_eq!(account.referral.referral_code, "alice");
        assert_eq!(account.referral.referred_by, None);
        assert_eq!(account.language, Locale::En);
        assert!(account.completed_task_ids.is_empty());

        assert!(get_account(db.pool(), "uid-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = Database::connect_in_memory().await.unwrap();
        create_account(db.pool(), &NewAccount::new("uid-1", "alice", ""), 0)
            .await
            .unwrap();

        let err = create_account(db.pool(), &NewAccount::new("uid-2", "alice", ""), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UsernameTaken(name) if name == "alice"));

        let err = create_account(db.pool(), &NewAccount::new("uid-1", "bob", ""), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_profile_updates() {
        let db = Database::connect_in_memory().await.unwrap();
        create_account(db.pool(), &NewAccount::new("uid-1", "alice", ""), 0)
            .await
            .unwrap();

        set_language(db.pool(), "uid-1", Locale::Bn).await.unwrap();
        set_photo_url(db.pool(), "uid-1", "https://img.example.com/a.png").await.unwrap();
        set_blocked(db.pool(), "uid-1", true).await.unwrap();

        let account = get_account(db.pool(), "uid-1").await.unwrap().unwrap();
        assert_eq!(account.language, Locale::Bn);
        assert_eq!(account.photo_url.as_deref(), Some("https://img.example.com/a.png"));
        assert!(account.is_blocked);

        let found = find_by_referral_code(db.pool(), "alice").await.unwrap().unwrap();
        assert_eq!(found.id, "uid-1");

        assert!(matches!(
            set_language(db.pool(), "nobody", Locale::Hi).await,
            Err(Error::AccountNotFound(_))
        ));
    }
}
