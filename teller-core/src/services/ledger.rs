//! Ledger service - balance mutations against an authenticated session
//!
//! Every operation takes the `Session` produced by login. Amount and balance
//! checks use the account state read at the start of the operation; the
//! store lock keeps any other process from moving money underneath them.
//! Postings that touch balances go through the repository's atomic
//! operations, so a record is never visible without its balance change.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::{
    credential, validate, Account, ProfileUpdate, Session, TransactionKind, TransactionRecord,
};

/// Ledger service for credit, debit, transfer and account maintenance
pub struct LedgerService {
    repository: Arc<DuckDbRepository>,
}

/// Receipt for a single-account posting
#[derive(Debug, Serialize)]
pub struct PostingReceipt {
    pub account_number: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub balance_after: Decimal,
}

/// Receipt for a transfer between two accounts
#[derive(Debug, Serialize)]
pub struct TransferReceipt {
    pub source_account: String,
    pub target_account: String,
    pub amount: Decimal,
    pub source_balance_after: Decimal,
}

impl LedgerService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Current balance of the session's account
    pub fn balance(&self, session: &Session) -> Result<Decimal> {
        Ok(self.fetch_account(session.account_number())?.balance)
    }

    /// Transaction history of the session's account, chronological
    pub fn history(&self, session: &Session) -> Result<Vec<TransactionRecord>> {
        self.repository.records_for_account(session.account_number())
    }

    /// Credit the session's account
    pub fn credit(&self, session: &Session, amount: Decimal) -> Result<PostingReceipt> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }
        let account = self.fetch_active_account(session.account_number())?;

        self.repository.post_credit(&account.account_number, amount)?;

        Ok(PostingReceipt {
            account_number: account.account_number,
            kind: TransactionKind::Credit,
            amount,
            balance_after: account.balance + amount,
        })
    }

    /// Debit the session's account. The sufficiency check uses the balance
    /// read at the start of the operation.
    pub fn debit(&self, session: &Session, amount: Decimal) -> Result<PostingReceipt> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }
        let account = self.fetch_active_account(session.account_number())?;
        if amount > account.balance {
            return Err(Error::InsufficientBalance);
        }

        self.repository.post_debit(&account.account_number, amount)?;

        Ok(PostingReceipt {
            account_number: account.account_number,
            kind: TransactionKind::Debit,
            amount,
            balance_after: account.balance - amount,
        })
    }

    /// Transfer from the session's account to another account.
    ///
    /// Checks run in the documented order: amount sign, then funds, then
    /// target existence. Only existence is required of the target; a
    /// deactivated target can still receive. The four effects (two balance
    /// updates, two records) commit together or not at all.
    pub fn transfer(
        &self,
        session: &Session,
        target_number: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }
        let source = self.fetch_active_account(session.account_number())?;
        if amount > source.balance {
            return Err(Error::InsufficientBalance);
        }
        let target = self
            .repository
            .get_account_by_number(target_number)?
            .ok_or_else(|| Error::TargetNotFound(target_number.to_string()))?;

        self.repository
            .post_transfer(&source.account_number, &target.account_number, amount)?;

        Ok(TransferReceipt {
            source_account: source.account_number,
            target_account: target.account_number,
            amount,
            source_balance_after: source.balance - amount,
        })
    }

    /// Flip the active flag and end the session, whichever direction the
    /// flag moved. Returns the new state.
    pub fn toggle_active(&self, session: Session) -> Result<bool> {
        let account = self.fetch_account(session.account_number())?;
        let next = !account.active;
        self.repository.set_active(&account.account_number, next)?;
        session.logout();
        Ok(next)
    }

    /// Replace the password after the strength check
    pub fn change_password(&self, session: &Session, new_password: &str) -> Result<()> {
        if !validate::is_valid_password(new_password) {
            return Err(Error::WeakPassword);
        }
        let digest = credential::hash_password(new_password)?;
        self.repository
            .set_password(session.account_number(), &digest)
    }

    /// Replace the four profile fields together, or none of them
    pub fn update_profile(&self, session: &Session, update: ProfileUpdate) -> Result<()> {
        update.validate()?;
        self.repository
            .update_profile(session.account_number(), &update)
    }

    fn fetch_account(&self, account_number: &str) -> Result<Account> {
        self.repository
            .get_account_by_number(account_number)?
            .ok_or_else(|| Error::AccountNotFound(account_number.to_string()))
    }

    fn fetch_active_account(&self, account_number: &str) -> Result<Account> {
        let account = self.fetch_account(account_number)?;
        if !account.active {
            return Err(Error::AccountDeactivated);
        }
        Ok(account)
    }
}
