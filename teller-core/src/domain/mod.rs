//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
pub mod credential;
pub mod result;
mod session;
mod transaction;
pub mod validate;

pub use account::{
    generate_account_number, Account, AccountProfile, ProfileUpdate, MINIMUM_OPENING_BALANCE,
};
pub use session::Session;
pub use transaction::{TransactionKind, TransactionRecord};
