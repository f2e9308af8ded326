//! Error types and Result alias for the rewards core

use thiserror::Error;

/// Main error type for reward operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account is blocked: {0}")]
    AccountBlocked(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("Invalid withdrawal: {0}")]
    InvalidWithdrawal(String),

    #[error("Mining not claimable yet: {remaining_secs}s remaining")]
    MiningNotClaimable { remaining_secs: i64 },

    #[error("Invalid referral code: {0}")]
    InvalidReferralCode(String),

    #[error("Cannot redeem your own referral code")]
    SelfReferral,

    #[error("Referral code already redeemed")]
    AlreadyReferred,
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidData(err.to_string())
    }
}
