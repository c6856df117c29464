//! Audit service - operational event logging to DuckDB
//!
//! Records what the tool did (accounts opened, logins, postings, failures)
//! in audit.duckdb, separate from the account store. Plain append-only rows;
//! passwords and digests are never written here.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use duckdb::Connection;
use serde::{Deserialize, Serialize};

use crate::audit_migrations::AUDIT_MIGRATIONS;
use crate::services::MigrationService;

/// Filename of the audit database inside the teller directory
const AUDIT_DB_FILENAME: &str = "audit.duckdb";

/// Columns of audit_events in read order
const ENTRY_COLUMNS: &str =
    "id, timestamp_ms, app_version, event, account_number, command, error_message, error_details";

/// Process-wide sequence so ids minted in the same millisecond stay distinct
static ID_SEQ: AtomicU64 = AtomicU64::new(0);

/// Millisecond timestamp in the high 48 bits, sequence in the low 16
fn generate_id() -> u64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    let seq = ID_SEQ.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (millis << 16) | seq
}

/// Current unix timestamp in milliseconds
fn now_ms() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    now.as_millis() as i64
}

/// An audit event to be recorded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl AuditEvent {
    /// An event carrying only a name; context comes from the builders
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            ..Self::default()
        }
    }

    /// Attach the account the event applies to
    pub fn with_account(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }

    /// Attach the CLI command context
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Attach an error message
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Attach extra error context
    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// An audit entry as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: u64,
    pub timestamp_ms: i64,
    pub app_version: String,
    pub event: String,
    pub account_number: Option<String>,
    pub command: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

fn row_to_entry(row: &duckdb::Row) -> duckdb::Result<AuditEntry> {
    Ok(AuditEntry {
        id: row.get(0)?,
        timestamp_ms: row.get(1)?,
        app_version: row.get(2)?,
        event: row.get(3)?,
        account_number: row.get(4)?,
        command: row.get(5)?,
        error_message: row.get(6)?,
        error_details: row.get(7)?,
    })
}

/// Owns audit.duckdb: records events, answers queries over the trail
pub struct AuditService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    app_version: String,
}

impl AuditService {
    /// Open or create the audit database and bring its schema up to date
    pub fn new(teller_dir: &Path, app_version: impl Into<String>) -> Result<Self> {
        let db_path = teller_dir.join(AUDIT_DB_FILENAME);
        let conn = Connection::open(&db_path)?;
        MigrationService::new(&conn, AUDIT_MIGRATIONS).run_pending()?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            app_version: app_version.into(),
        })
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    /// Record one event; id, timestamp and app version are filled in here
    pub fn record(&self, event: AuditEvent) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            &format!("INSERT INTO audit_events ({ENTRY_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"),
            duckdb::params![
                generate_id(),
                now_ms(),
                &self.app_version,
                &event.event,
                &event.account_number,
                &event.command,
                &event.error_message,
                &event.error_details,
            ],
        )?;
        Ok(())
    }

    /// Record a bare named event
    pub fn record_event(&self, event: &str) -> Result<()> {
        self.record(AuditEvent::new(event))
    }

    /// Record an operation against one account
    pub fn record_operation(&self, event: &str, account_number: &str) -> Result<()> {
        self.record(AuditEvent::new(event).with_account(account_number))
    }

    /// Record a failure with its message and optional context
    pub fn record_error(&self, event: &str, message: &str, details: Option<&str>) -> Result<()> {
        let mut audit_event = AuditEvent::new(event).with_error(message);
        if let Some(d) = details {
            audit_event = audit_event.with_error_details(d);
        }
        self.record(audit_event)
    }

    /// Most recent entries, newest first
    pub fn get_recent(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        self.query_entries("", limit)
    }

    /// Most recent entries that recorded an error, newest first
    pub fn get_errors(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        self.query_entries("WHERE error_message IS NOT NULL", limit)
    }

    fn query_entries(&self, filter: &str, limit: usize) -> Result<Vec<AuditEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM audit_events {filter} \
             ORDER BY timestamp_ms DESC, id DESC LIMIT ?"
        );

        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map([limit as i64], |row| row_to_entry(row))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    /// Total number of entries in the trail
    pub fn count(&self) -> Result<u64> {
        let conn = self.lock_conn()?;
        let count: u64 =
            conn.query_row("SELECT COUNT(*) FROM audit_events", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Drop entries older than the cutoff (unix ms); returns how many went
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let conn = self.lock_conn()?;
        let deleted = conn.execute(
            "DELETE FROM audit_events WHERE timestamp_ms < ?",
            [timestamp_ms],
        )?;
        Ok(deleted as u64)
    }

    /// Copy the audit database to a file for inspection.
    /// Checkpoints first so the copy holds every recorded row.
    pub fn export(&self, output_path: &Path) -> Result<PathBuf> {
        let conn = self.lock_conn()?;
        conn.execute("CHECKPOINT", [])?;
        std::fs::copy(&self.db_path, output_path)?;
        Ok(output_path.to_path_buf())
    }

    /// Path of the audit database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
