//! Teller Core - Business logic for a single user banking ledger
//!
//! This crate implements the core domain logic in three layers:
//!
//! - **domain**: Core business entities (Account, TransactionRecord, Session)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB store, lock file)

pub mod adapters;
pub mod audit_migrations;
pub mod config;
pub mod domain;
pub mod migrations;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbRepository;
use adapters::lockfile::StoreLock;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    Account, AccountProfile, ProfileUpdate, Session, TransactionKind, TransactionRecord,
    MINIMUM_OPENING_BALANCE,
};

/// Main context for teller operations
///
/// This is the primary entry point for all business logic. It holds
/// the store lock, the database connection, configuration, and all
/// services. The lock is released when the context is dropped.
pub struct TellerContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub account_service: AccountService,
    pub ledger_service: LedgerService,
    pub doctor_service: DoctorService,
    pub audit_service: Option<AuditService>,
    _lock: StoreLock,
}

impl TellerContext {
    /// Create a new teller context
    ///
    /// Acquires the exclusive store lock first, so a second process
    /// pointed at the same directory fails before touching the database.
    pub fn new(teller_dir: &Path) -> Result<Self> {
        let config = Config::load(teller_dir)?;
        let lock = StoreLock::acquire(teller_dir)?;

        let db_path = teller_dir.join(&config.db_filename);
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);

        // Initialize schema
        repository.ensure_schema()?;

        // Create services
        let account_service = AccountService::new(Arc::clone(&repository));
        let ledger_service = LedgerService::new(Arc::clone(&repository));
        let doctor_service = DoctorService::new(Arc::clone(&repository));

        let audit_service = if config.audit_enabled {
            Some(AuditService::new(teller_dir, env!("CARGO_PKG_VERSION"))?)
        } else {
            None
        };

        Ok(Self {
            config,
            repository,
            account_service,
            ledger_service,
            doctor_service,
            audit_service,
            _lock: lock,
        })
    }
}
