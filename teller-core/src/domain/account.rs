//! Account domain model

use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::validate;

/// Minimum opening balance accepted when an account is created
pub const MINIMUM_OPENING_BALANCE: i64 = 2000;

/// A bank account row.
///
/// `id` is the internal store identifier; `account_number` is the external
/// 10-digit identifier customers use. Accounts are never deleted, only
/// deactivated.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i64,
    pub account_number: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub city: String,
    pub address: String,
    pub contact_number: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub balance: Decimal,
    pub active: bool,
}

impl Account {
    /// Create an account row ready for insertion. The store assigns the real
    /// id; until then it is 0.
    pub fn new(
        account_number: impl Into<String>,
        profile: AccountProfile,
        password_digest: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Self {
            id: 0,
            account_number: account_number.into(),
            name: profile.name,
            date_of_birth: profile.date_of_birth,
            city: profile.city,
            address: profile.address,
            contact_number: profile.contact_number,
            email: profile.email,
            password_digest: password_digest.into(),
            balance,
            active: true,
        }
    }
}

/// Profile fields collected when opening an account
#[derive(Debug, Clone, Serialize)]
pub struct AccountProfile {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub city: String,
    pub address: String,
    pub contact_number: String,
    pub email: String,
}

impl AccountProfile {
    /// Validate the externally constrained fields
    pub fn validate(&self) -> Result<()> {
        if !validate::is_valid_contact(&self.contact_number) {
            return Err(Error::InvalidContact);
        }
        if !validate::is_valid_email(&self.email) {
            return Err(Error::InvalidEmail);
        }
        Ok(())
    }
}

/// The four fields a profile update replaces together
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub city: String,
    pub address: String,
    pub contact_number: String,
    pub email: String,
}

impl ProfileUpdate {
    /// All four fields persist together or not at all, so a single failed
    /// check rejects the whole update
    pub fn validate(&self) -> Result<()> {
        if !validate::is_valid_contact(&self.contact_number)
            || !validate::is_valid_email(&self.email)
        {
            return Err(Error::InvalidProfile);
        }
        Ok(())
    }
}

/// Generate a candidate account number, uniform over the 10-digit range.
/// Uniqueness is the store's unique constraint plus the caller's retry loop.
pub fn generate_account_number() -> String {
    let n: u64 = rand::thread_rng().gen_range(1_000_000_000..9_999_999_999);
    n.to_string()
}
