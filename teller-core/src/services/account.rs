//! Account service - account opening, lookup and authentication

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::{
    credential, generate_account_number, Account, AccountProfile, Session,
    MINIMUM_OPENING_BALANCE,
};

/// Attempts at finding an unused account number before giving up
const ACCOUNT_NUMBER_ATTEMPTS: u32 = 5;

/// Account service for opening, listing and authenticating accounts
pub struct AccountService {
    repository: Arc<DuckDbRepository>,
}

/// Outcome of opening an account
#[derive(Debug, Serialize)]
pub struct OpenedAccount {
    pub account_number: String,
    pub name: String,
    pub balance: Decimal,
}

/// Store totals for display
#[derive(Debug, Serialize)]
pub struct StoreSummary {
    pub accounts: i64,
    pub active_accounts: i64,
    pub transactions: i64,
    pub total_balance: Decimal,
    pub db_size_bytes: u64,
}

impl AccountService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Open a new account.
    ///
    /// Validates the profile and password, enforces the opening-balance
    /// floor, then inserts with a generated 10-digit account number. A
    /// collision on the number retries with a fresh one; after
    /// `ACCOUNT_NUMBER_ATTEMPTS` collisions the whole operation fails with
    /// `DuplicateAccountNumber`.
    pub fn open_account(
        &self,
        profile: AccountProfile,
        password: &str,
        initial_balance: Decimal,
    ) -> Result<OpenedAccount> {
        profile.validate()?;
        if !crate::domain::validate::is_valid_password(password) {
            return Err(Error::WeakPassword);
        }
        if initial_balance < Decimal::from(MINIMUM_OPENING_BALANCE) {
            return Err(Error::BelowMinimumBalance(Decimal::from(
                MINIMUM_OPENING_BALANCE,
            )));
        }

        let digest = credential::hash_password(password)?;

        for _ in 0..ACCOUNT_NUMBER_ATTEMPTS {
            let account = Account::new(
                generate_account_number(),
                profile.clone(),
                digest.clone(),
                initial_balance,
            );
            match self.repository.insert_account(&account) {
                Ok(_id) => {
                    return Ok(OpenedAccount {
                        account_number: account.account_number,
                        name: account.name,
                        balance: account.balance,
                    })
                }
                Err(Error::DuplicateAccountNumber) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(Error::DuplicateAccountNumber)
    }

    /// All accounts in insertion order, for display
    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        self.repository.list_accounts()
    }

    /// Look up an account by number
    pub fn find_account(&self, account_number: &str) -> Result<Option<Account>> {
        self.repository.get_account_by_number(account_number)
    }

    /// Credential check without the active-status gate: the account, if the
    /// number exists and the password verifies against the stored digest.
    /// Callers decide what inactive means for them.
    pub fn verify_credentials(
        &self,
        account_number: &str,
        password: &str,
    ) -> Result<Option<Account>> {
        let Some(account) = self.repository.get_account_by_number(account_number)? else {
            return Ok(None);
        };
        if !credential::verify_password(password, &account.password_digest) {
            return Ok(None);
        }
        Ok(Some(account))
    }

    /// Authenticate and start a session.
    ///
    /// A missing account and a wrong password are indistinguishable to the
    /// caller; both report `InvalidCredentials`. An inactive account reports
    /// `AccountDeactivated` only after the credentials pass. Rows still
    /// holding a legacy digest are rehashed with the current scheme here.
    pub fn login(&self, account_number: &str, password: &str) -> Result<Session> {
        let Some(account) = self.verify_credentials(account_number, password)? else {
            return Err(Error::InvalidCredentials);
        };

        if credential::is_legacy_digest(&account.password_digest) {
            let digest = credential::hash_password(password)?;
            self.repository.set_password(&account.account_number, &digest)?;
        }

        if !account.active {
            return Err(Error::AccountDeactivated);
        }

        Ok(Session::open(account.account_number))
    }

    /// Store totals for the status display
    pub fn summary(&self) -> Result<StoreSummary> {
        Ok(StoreSummary {
            accounts: self.repository.get_account_count()?,
            active_accounts: self.repository.get_active_account_count()?,
            transactions: self.repository.get_record_count()?,
            total_balance: self.repository.get_total_balance()?,
            db_size_bytes: self.repository.get_db_size()?,
        })
    }
}
