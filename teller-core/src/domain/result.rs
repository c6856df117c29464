//! Result and error types for the core library

use rust_decimal::Decimal;
use thiserror::Error;

/// Core library error type.
///
/// The first group are named operation outcomes: every one of them is
/// recoverable, reported to the caller and surfaced to the user without
/// ending the session. The second group are infrastructure failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Account {0} not found")]
    AccountNotFound(String),

    #[error("Target account {0} not found")]
    TargetNotFound(String),

    #[error("Could not allocate an unused account number")]
    DuplicateAccountNumber,

    #[error("Opening balance must be at least {0}")]
    BelowMinimumBalance(Decimal),

    #[error("Password must be at least 8 characters with an uppercase letter, a lowercase letter, a digit and one of @$!%*?&")]
    WeakPassword,

    #[error("Contact number must be exactly 10 digits")]
    InvalidContact,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Profile rejected: contact number or email is invalid")]
    InvalidProfile,

    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error("Invalid account number or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Data directory is locked: {0}")]
    StoreLocked(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a credential error
    pub fn credential(msg: impl Into<String>) -> Self {
        Self::Credential(msg.into())
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
