//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and repository access. Each service
//! focuses on a specific use case or feature area.

mod account;
pub mod audit;
mod doctor;
mod ledger;
pub mod migration;

pub use account::{AccountService, OpenedAccount, StoreSummary};
pub use audit::{AuditEntry, AuditEvent, AuditService};
pub use doctor::{CheckResult, DoctorResult, DoctorService, DoctorSummary};
pub use ledger::{LedgerService, PostingReceipt, TransferReceipt};
pub use migration::{MigrationResult, MigrationService};
