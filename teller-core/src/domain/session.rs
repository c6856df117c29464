//! Authenticated session value
//!
//! A `Session` exists only between a successful login and logout. Operations
//! that keep the session alive borrow it; the two that end it (`logout` and
//! the activation toggle) take it by value, so a logged-out session cannot be
//! used again.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Proof of a successful login for one account
#[derive(Debug, Serialize)]
pub struct Session {
    account_number: String,
    started_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn open(account_number: impl Into<String>) -> Self {
        Self {
            account_number: account_number.into(),
            started_at: Utc::now(),
        }
    }

    /// Account this session is authenticated for
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// When the login happened
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// End the session. Consuming the value is the state change.
    pub fn logout(self) {}
}
