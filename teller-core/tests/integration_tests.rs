//! Integration tests for teller-core services
//!
//! These tests verify money movement and account lifecycle scenarios using
//! real DuckDB files in temporary directories. No mocks anywhere.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;
use tempfile::TempDir;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use teller_core::adapters::duckdb::DuckDbRepository;
use teller_core::domain::credential;
use teller_core::domain::result::Error;
use teller_core::domain::{Account, AccountProfile, ProfileUpdate, TransactionKind};
use teller_core::services::{AccountService, LedgerService};
use teller_core::TellerContext;

const STRONG_PASSWORD: &str = "Str0ng@Pass";

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a test repository with schema initialized
fn create_test_repo(temp_dir: &TempDir) -> Arc<DuckDbRepository> {
    let db_path = temp_dir.path().join("teller.duckdb");
    let repo = DuckDbRepository::new(&db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Failed to initialize schema");
    Arc::new(repo)
}

/// Create the repository plus both services over it
fn create_services(temp_dir: &TempDir) -> (Arc<DuckDbRepository>, AccountService, LedgerService) {
    let repo = create_test_repo(temp_dir);
    let accounts = AccountService::new(Arc::clone(&repo));
    let ledger = LedgerService::new(Arc::clone(&repo));
    (repo, accounts, ledger)
}

/// A valid profile for test accounts
fn sample_profile(name: &str) -> AccountProfile {
    AccountProfile {
        name: name.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1992, 7, 4).unwrap(),
        city: "Portland".to_string(),
        address: "88 Pine Street".to_string(),
        contact_number: "5035551234".to_string(),
        email: "holder@example.com".to_string(),
    }
}

/// Open an account with the standard test password, return its number
fn open_test_account(accounts: &AccountService, name: &str, balance: i64) -> String {
    accounts
        .open_account(sample_profile(name), STRONG_PASSWORD, Decimal::from(balance))
        .expect("Failed to open account")
        .account_number
}

// ============================================================================
// Account Opening Tests
// ============================================================================

/// Test that opening assigns a 10 digit number and keeps the deposit
#[test]
fn test_open_account_assigns_ten_digit_number() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, _ledger) = create_services(&temp_dir);

    let opened = accounts
        .open_account(
            sample_profile("Mina Patel"),
            STRONG_PASSWORD,
            Decimal::from(5000),
        )
        .unwrap();

    assert_eq!(opened.account_number.len(), 10);
    assert!(opened.account_number.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(opened.name, "Mina Patel");
    assert_eq!(opened.balance, Decimal::from(5000));
}

/// Test that successive openings get distinct numbers
#[test]
fn test_account_numbers_are_unique() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, _ledger) = create_services(&temp_dir);

    let a = open_test_account(&accounts, "First", 3000);
    let b = open_test_account(&accounts, "Second", 3000);
    let c = open_test_account(&accounts, "Third", 3000);

    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_ne!(a, c);
}

/// Test the opening balance floor
#[test]
fn test_opening_below_minimum_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, _ledger) = create_services(&temp_dir);

    let result = accounts.open_account(
        sample_profile("Too Low"),
        STRONG_PASSWORD,
        Decimal::from(1999),
    );

    assert!(matches!(result, Err(Error::BelowMinimumBalance(_))));
    assert!(accounts.list_accounts().unwrap().is_empty());
}

/// Test password policy enforcement at opening
#[test]
fn test_weak_password_is_rejected_at_opening() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, _ledger) = create_services(&temp_dir);

    // No uppercase letter
    let result = accounts.open_account(
        sample_profile("Weak Password"),
        "alllowercase1@",
        Decimal::from(5000),
    );

    assert!(matches!(result, Err(Error::WeakPassword)));
    assert!(accounts.list_accounts().unwrap().is_empty());
}

/// Test contact number validation at opening
#[test]
fn test_invalid_contact_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, _ledger) = create_services(&temp_dir);

    let mut profile = sample_profile("Bad Contact");
    profile.contact_number = "12345".to_string();

    let result = accounts.open_account(profile, STRONG_PASSWORD, Decimal::from(5000));
    assert!(matches!(result, Err(Error::InvalidContact)));
}

/// Test email validation at opening
#[test]
fn test_invalid_email_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, _ledger) = create_services(&temp_dir);

    let mut profile = sample_profile("Bad Email");
    profile.email = "not-an-email".to_string();

    let result = accounts.open_account(profile, STRONG_PASSWORD, Decimal::from(5000));
    assert!(matches!(result, Err(Error::InvalidEmail)));
}

/// Test that the opening deposit is not written to the transaction log
#[test]
fn test_opening_deposit_is_not_a_transaction() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Fresh", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    let history = ledger.history(&session).unwrap();
    assert!(history.is_empty(), "Opening deposit should not be logged");
}

/// Test that accounts list in insertion order
#[test]
fn test_list_accounts_preserves_insertion_order() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, _ledger) = create_services(&temp_dir);

    open_test_account(&accounts, "Alpha", 3000);
    open_test_account(&accounts, "Beta", 3000);
    open_test_account(&accounts, "Gamma", 3000);

    let all = accounts.list_accounts().unwrap();
    let names: Vec<&str> = all.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
}

// ============================================================================
// Login and Session Tests
// ============================================================================

/// Test login with correct credentials and balance read
#[test]
fn test_login_and_balance() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Holder", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    assert_eq!(session.account_number(), number);
    assert_eq!(ledger.balance(&session).unwrap(), Decimal::from(5000));
}

/// Test that a wrong password is rejected as invalid credentials
#[test]
fn test_login_wrong_password() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, _ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Holder", 5000);
    let result = accounts.login(&number, "Wrong1@pass");

    assert!(matches!(result, Err(Error::InvalidCredentials)));
}

/// Test that an unknown account number is indistinguishable from a wrong
/// password
#[test]
fn test_login_unknown_account() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, _ledger) = create_services(&temp_dir);

    let result = accounts.login("0000000000", STRONG_PASSWORD);
    assert!(matches!(result, Err(Error::InvalidCredentials)));
}

/// Test deactivation: the toggle ends the session and blocks further logins
/// until the account is reactivated at the store level
#[test]
fn test_toggle_active_blocks_login() {
    let temp_dir = TempDir::new().unwrap();
    let (repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Toggler", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    let now_active = ledger.toggle_active(session).unwrap();
    assert!(!now_active, "Toggle from active should deactivate");

    let result = accounts.login(&number, STRONG_PASSWORD);
    assert!(matches!(result, Err(Error::AccountDeactivated)));

    // Reactivate at the store level, then login works again
    repo.set_active(&number, true).unwrap();
    assert!(accounts.login(&number, STRONG_PASSWORD).is_ok());
}

/// Test that a legacy sha256 digest still verifies and is upgraded to the
/// salted form on the first successful login
#[test]
fn test_legacy_digest_login_upgrades() {
    let temp_dir = TempDir::new().unwrap();
    let (repo, accounts, _ledger) = create_services(&temp_dir);

    let account = Account::new(
        "4242424242",
        sample_profile("Legacy Holder"),
        credential::legacy_digest(STRONG_PASSWORD),
        Decimal::from(5000),
    );
    repo.insert_account(&account).unwrap();

    accounts.login("4242424242", STRONG_PASSWORD).unwrap();

    let stored = repo.get_account_by_number("4242424242").unwrap().unwrap();
    assert!(
        stored.password_digest.starts_with("$argon2"),
        "Digest should be upgraded after login"
    );

    // And the upgraded digest still verifies
    assert!(accounts.login("4242424242", STRONG_PASSWORD).is_ok());
}

// ============================================================================
// Posting Tests
// ============================================================================

/// Test credit: balance moves and a record is appended
#[test]
fn test_credit_updates_balance_and_appends_record() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Saver", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    let receipt = ledger.credit(&session, Decimal::from(1000)).unwrap();
    assert_eq!(receipt.balance_after, Decimal::from(6000));
    assert_eq!(ledger.balance(&session).unwrap(), Decimal::from(6000));

    let history = ledger.history(&session).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, TransactionKind::Credit);
    assert_eq!(history[0].amount, Decimal::from(1000));
    assert_eq!(history[0].account_number, number);
}

/// Test debit with sufficient funds
#[test]
fn test_debit_with_sufficient_funds() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Spender", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    let receipt = ledger.debit(&session, Decimal::from(500)).unwrap();
    assert_eq!(receipt.balance_after, Decimal::from(4500));

    let history = ledger.history(&session).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, TransactionKind::Debit);
}

/// Test that a credit and a debit of the same amount round trip the balance
#[test]
fn test_credit_then_debit_round_trips_balance() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Round", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    ledger.credit(&session, Decimal::from(1000)).unwrap();
    ledger.debit(&session, Decimal::from(1000)).unwrap();

    assert_eq!(ledger.balance(&session).unwrap(), Decimal::from(5000));
    assert_eq!(
        ledger.history(&session).unwrap().len(),
        2,
        "Round trip should leave exactly two records"
    );
}

/// Test that an overdraw leaves no trace: no balance change, no record
#[test]
fn test_overdraw_is_rejected_without_side_effects() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Overdrawn", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    let result = ledger.debit(&session, Decimal::from(7000));
    assert!(matches!(result, Err(Error::InsufficientBalance)));

    assert_eq!(ledger.balance(&session).unwrap(), Decimal::from(5000));
    assert!(ledger.history(&session).unwrap().is_empty());
}

/// Test that zero and negative amounts are rejected everywhere
#[test]
fn test_zero_and_negative_amounts_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Careful", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    assert!(matches!(
        ledger.credit(&session, Decimal::ZERO),
        Err(Error::InvalidAmount)
    ));
    assert!(matches!(
        ledger.debit(&session, Decimal::from(-5)),
        Err(Error::InvalidAmount)
    ));
    assert!(matches!(
        ledger.transfer(&session, "1111111111", Decimal::ZERO),
        Err(Error::InvalidAmount)
    ));

    assert!(ledger.history(&session).unwrap().is_empty());
}

/// Test that history comes back in posting order with system timestamps
#[test]
fn test_history_is_chronological() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Busy", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    ledger.credit(&session, Decimal::from(100)).unwrap();
    ledger.debit(&session, Decimal::from(50)).unwrap();
    ledger.credit(&session, Decimal::from(25)).unwrap();

    let history = ledger.history(&session).unwrap();
    let kinds: Vec<TransactionKind> = history.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::Credit,
            TransactionKind::Debit,
            TransactionKind::Credit
        ]
    );
    assert!(
        history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
        "Timestamps should be non-decreasing"
    );
}

// ============================================================================
// Transfer Tests
// ============================================================================

/// Test a successful transfer: both balances move, both legs are recorded
#[test]
fn test_transfer_moves_funds_and_records_both_legs() {
    let temp_dir = TempDir::new().unwrap();
    let (repo, accounts, ledger) = create_services(&temp_dir);

    let source = open_test_account(&accounts, "Source", 5000);
    let target = open_test_account(&accounts, "Target", 3000);
    let session = accounts.login(&source, STRONG_PASSWORD).unwrap();

    let receipt = ledger
        .transfer(&session, &target, Decimal::from(2000))
        .unwrap();
    assert_eq!(receipt.source_balance_after, Decimal::from(3000));

    let source_account = repo.get_account_by_number(&source).unwrap().unwrap();
    let target_account = repo.get_account_by_number(&target).unwrap().unwrap();
    assert_eq!(source_account.balance, Decimal::from(3000));
    assert_eq!(target_account.balance, Decimal::from(5000));

    let source_history = repo.records_for_account(&source).unwrap();
    assert_eq!(source_history.len(), 1);
    assert_eq!(source_history[0].kind, TransactionKind::TransferOut);
    assert_eq!(source_history[0].amount, Decimal::from(2000));

    let target_history = repo.records_for_account(&target).unwrap();
    assert_eq!(target_history.len(), 1);
    assert_eq!(target_history[0].kind, TransactionKind::TransferIn);
    assert_eq!(target_history[0].amount, Decimal::from(2000));
}

/// Test that an insufficient transfer changes nothing on either side
#[test]
fn test_transfer_insufficient_funds_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let (repo, accounts, ledger) = create_services(&temp_dir);

    let source = open_test_account(&accounts, "Source", 5000);
    let target = open_test_account(&accounts, "Target", 3000);
    let session = accounts.login(&source, STRONG_PASSWORD).unwrap();

    let result = ledger.transfer(&session, &target, Decimal::from(9000));
    assert!(matches!(result, Err(Error::InsufficientBalance)));

    let source_account = repo.get_account_by_number(&source).unwrap().unwrap();
    let target_account = repo.get_account_by_number(&target).unwrap().unwrap();
    assert_eq!(source_account.balance, Decimal::from(5000));
    assert_eq!(target_account.balance, Decimal::from(3000));
    assert!(repo.records_for_account(&source).unwrap().is_empty());
    assert!(repo.records_for_account(&target).unwrap().is_empty());
}

/// Test that a transfer to an unknown number reports the target and leaves
/// the source untouched
#[test]
fn test_transfer_to_unknown_target() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, ledger) = create_services(&temp_dir);

    let source = open_test_account(&accounts, "Source", 5000);
    let session = accounts.login(&source, STRONG_PASSWORD).unwrap();

    let result = ledger.transfer(&session, "1234509876", Decimal::from(100));
    match result {
        Err(Error::TargetNotFound(number)) => assert_eq!(number, "1234509876"),
        other => panic!("Expected TargetNotFound, got {other:?}"),
    }

    assert_eq!(ledger.balance(&session).unwrap(), Decimal::from(5000));
    assert!(ledger.history(&session).unwrap().is_empty());
}

/// Test that a deactivated target can still receive funds
#[test]
fn test_transfer_to_inactive_target_is_allowed() {
    let temp_dir = TempDir::new().unwrap();
    let (repo, accounts, ledger) = create_services(&temp_dir);

    let source = open_test_account(&accounts, "Source", 5000);
    let target = open_test_account(&accounts, "Dormant", 3000);
    repo.set_active(&target, false).unwrap();

    let session = accounts.login(&source, STRONG_PASSWORD).unwrap();
    ledger
        .transfer(&session, &target, Decimal::from(1000))
        .unwrap();

    let target_account = repo.get_account_by_number(&target).unwrap().unwrap();
    assert_eq!(target_account.balance, Decimal::from(4000));
}

/// Test that a self transfer nets to zero but records both legs
#[test]
fn test_self_transfer_nets_to_zero() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Loop", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    ledger.transfer(&session, &number, Decimal::from(1000)).unwrap();

    assert_eq!(ledger.balance(&session).unwrap(), Decimal::from(5000));

    let history = ledger.history(&session).unwrap();
    let kinds: Vec<TransactionKind> = history.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![TransactionKind::TransferOut, TransactionKind::TransferIn]
    );
}

// ============================================================================
// Account Maintenance Tests
// ============================================================================

/// Test password change: weak replacement rejected, strong one takes effect
#[test]
fn test_change_password() {
    let temp_dir = TempDir::new().unwrap();
    let (_repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Rotator", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    // Weak replacement leaves the old password in place
    let result = ledger.change_password(&session, "weak");
    assert!(matches!(result, Err(Error::WeakPassword)));
    assert!(accounts.login(&number, STRONG_PASSWORD).is_ok());

    // Strong replacement takes effect immediately
    ledger.change_password(&session, "N3w@Secret").unwrap();
    assert!(matches!(
        accounts.login(&number, STRONG_PASSWORD),
        Err(Error::InvalidCredentials)
    ));
    assert!(accounts.login(&number, "N3w@Secret").is_ok());
}

/// Test profile update: all four fields persist together, or none do
#[test]
fn test_update_profile_all_or_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let (repo, accounts, ledger) = create_services(&temp_dir);

    let number = open_test_account(&accounts, "Mover", 5000);
    let session = accounts.login(&number, STRONG_PASSWORD).unwrap();

    ledger
        .update_profile(
            &session,
            ProfileUpdate {
                city: "Salem".to_string(),
                address: "9 Oak Avenue".to_string(),
                contact_number: "9715550000".to_string(),
                email: "mover@example.net".to_string(),
            },
        )
        .unwrap();

    let updated = repo.get_account_by_number(&number).unwrap().unwrap();
    assert_eq!(updated.city, "Salem");
    assert_eq!(updated.address, "9 Oak Avenue");
    assert_eq!(updated.contact_number, "9715550000");
    assert_eq!(updated.email, "mover@example.net");

    // A bad contact number rejects the whole update
    let result = ledger.update_profile(
        &session,
        ProfileUpdate {
            city: "Eugene".to_string(),
            address: "1 Fir Court".to_string(),
            contact_number: "bad".to_string(),
            email: "mover@example.net".to_string(),
        },
    );
    assert!(matches!(result, Err(Error::InvalidProfile)));

    let unchanged = repo.get_account_by_number(&number).unwrap().unwrap();
    assert_eq!(unchanged.city, "Salem");
    assert_eq!(unchanged.address, "9 Oak Avenue");
}

// ============================================================================
// Full Scenario Test
// ============================================================================

/// Walk one account through a realistic session: deposit, failed overdraw,
/// then a transfer out
#[test]
fn test_full_session_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let (repo, accounts, ledger) = create_services(&temp_dir);

    let main = open_test_account(&accounts, "Main", 5000);
    let session = accounts.login(&main, STRONG_PASSWORD).unwrap();

    ledger.credit(&session, Decimal::from(1000)).unwrap();
    assert_eq!(ledger.balance(&session).unwrap(), Decimal::from(6000));

    let overdraw = ledger.debit(&session, Decimal::from(7000));
    assert!(matches!(overdraw, Err(Error::InsufficientBalance)));
    assert_eq!(ledger.balance(&session).unwrap(), Decimal::from(6000));

    let other = open_test_account(&accounts, "Other", 3000);
    ledger.transfer(&session, &other, Decimal::from(2000)).unwrap();

    assert_eq!(ledger.balance(&session).unwrap(), Decimal::from(4000));
    let other_account = repo.get_account_by_number(&other).unwrap().unwrap();
    assert_eq!(other_account.balance, Decimal::from(5000));

    let history = ledger.history(&session).unwrap();
    let kinds: Vec<TransactionKind> = history.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![TransactionKind::Credit, TransactionKind::TransferOut]
    );
}

// ============================================================================
// Store Level Tests
// ============================================================================

/// Test that everything survives closing and reopening the store
#[test]
fn test_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("teller.duckdb");

    let number;
    {
        let repo = Arc::new(DuckDbRepository::new(&db_path).unwrap());
        repo.ensure_schema().unwrap();
        let accounts = AccountService::new(Arc::clone(&repo));
        let ledger = LedgerService::new(Arc::clone(&repo));

        number = open_test_account(&accounts, "Durable", 5000);
        let session = accounts.login(&number, STRONG_PASSWORD).unwrap();
        ledger.credit(&session, Decimal::from(500)).unwrap();
    }

    let repo = DuckDbRepository::new(&db_path).unwrap();
    let account = repo.get_account_by_number(&number).unwrap().unwrap();
    assert_eq!(account.balance, Decimal::from(5500));

    let records = repo.records_for_account(&number).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, TransactionKind::Credit);
}

/// Test that the context lock keeps a second process out of the store
#[test]
fn test_context_lock_excludes_second_opener() {
    let temp_dir = TempDir::new().unwrap();

    let first = TellerContext::new(temp_dir.path()).unwrap();
    assert!(
        TellerContext::new(temp_dir.path()).is_err(),
        "Second context should fail while the lock is held"
    );

    drop(first);
    assert!(
        TellerContext::new(temp_dir.path()).is_ok(),
        "Lock should be free after the first context is dropped"
    );
}

/// Test the context end to end: open, login, post, audit trail recorded
#[test]
fn test_context_wires_services_together() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = TellerContext::new(temp_dir.path()).unwrap();

    let opened = ctx
        .account_service
        .open_account(
            sample_profile("Context User"),
            STRONG_PASSWORD,
            Decimal::from(5000),
        )
        .unwrap();

    let session = ctx
        .account_service
        .login(&opened.account_number, STRONG_PASSWORD)
        .unwrap();
    ctx.ledger_service
        .credit(&session, Decimal::from(250))
        .unwrap();

    let summary = ctx.account_service.summary().unwrap();
    assert_eq!(summary.accounts, 1);
    assert_eq!(summary.active_accounts, 1);
    assert_eq!(summary.transactions, 1);
    assert_eq!(summary.total_balance, Decimal::from(5250));

    let doctor = ctx.doctor_service.run_checks().unwrap();
    assert_eq!(doctor.summary.errors, 0);

    let audit = ctx.audit_service.as_ref().expect("audit enabled by default");
    audit.record_event("smoke_test").unwrap();
    assert!(audit.count().unwrap() >= 1);
}
