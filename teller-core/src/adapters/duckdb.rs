//! DuckDB repository implementation
//!
//! One connection behind a mutex, opened once at startup and dropped at
//! shutdown. Money columns are DECIMAL(18,2); they are bound as strings
//! through CAST(...) on writes and read back through a ::VARCHAR cast with
//! exact reparsing, so no float conversion ever touches a balance.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use duckdb::{params, Connection};
use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, ProfileUpdate, TransactionKind, TransactionRecord};
use crate::migrations::MIGRATIONS;
use crate::services::MigrationService;

/// Check if an error message reports a UNIQUE constraint violation.
/// DuckDB surfaces these as constraint errors with no dedicated code, so the
/// message text is the only signal.
fn is_unique_violation(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("duplicate key") || lower.contains("unique constraint")
}

const ACCOUNT_COLUMNS: &str = "id, name, account_number, date_of_birth::VARCHAR, city, \
     password_digest, balance::VARCHAR, contact_number, email, address, active";

const RECORD_COLUMNS: &str = "id, account_number, kind, amount::VARCHAR, created_at::VARCHAR";

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Open (or create) the store at the given path
    pub fn new(db_path: &Path) -> Result<Self> {
        // IMPORTANT: Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: db_path.to_path_buf(),
        })
    }

    /// Run database migrations using the MigrationService
    ///
    /// Returns the migration result showing what was applied.
    pub fn run_migrations(&self) -> Result<crate::services::MigrationResult> {
        let conn = self.conn.lock().unwrap();
        let migration_service = MigrationService::new(&conn, MIGRATIONS);
        migration_service
            .run_pending()
            .map_err(|e| Error::database(e.to_string()))
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    // === Account operations ===

    /// Insert a new account row and return the assigned id.
    /// A collision on the account_number UNIQUE constraint maps to
    /// `DuplicateAccountNumber` so the caller can retry with a fresh number.
    pub fn insert_account(&self, account: &Account) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "INSERT INTO accounts
                (name, account_number, date_of_birth, city, password_digest,
                 balance, contact_number, email, address, active)
             VALUES (?, ?, CAST(? AS DATE), ?, ?, CAST(? AS DECIMAL(18,2)), ?, ?, ?, ?)
             RETURNING id",
            params![
                account.name,
                account.account_number,
                account.date_of_birth.to_string(),
                account.city,
                account.password_digest,
                account.balance.to_string(),
                account.contact_number,
                account.email,
                account.address,
                account.active,
            ],
            |row| row.get::<_, i64>(0),
        );

        match result {
            Ok(id) => Ok(id),
            Err(e) if is_unique_violation(&e.to_string()) => Err(Error::DuplicateAccountNumber),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_account_by_number(&self, account_number: &str) -> Result<Option<Account>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_number = ?"
        ))?;

        match stmt.query_row(params![account_number], Self::row_to_account) {
            Ok(account) => Ok(Some(account)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All accounts in insertion order
    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"))?;

        let rows = stmt.query_map([], Self::row_to_account)?;
        let mut accounts = Vec::new();
        for row in rows {
            accounts.push(row?);
        }
        Ok(accounts)
    }

    /// Add delta (possibly negative) to an account balance. Sufficiency is
    /// the caller's contract; this only refuses a missing row.
    pub fn update_balance(&self, account_number: &str, delta: Decimal) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        Self::apply_balance_delta(&conn, account_number, delta)
    }

    pub fn set_active(&self, account_number: &str, active: bool) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE accounts SET active = ? WHERE account_number = ?",
            params![active, account_number],
        )?;
        if updated == 0 {
            return Err(Error::AccountNotFound(account_number.to_string()));
        }
        Ok(())
    }

    pub fn set_password(&self, account_number: &str, password_digest: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE accounts SET password_digest = ? WHERE account_number = ?",
            params![password_digest, account_number],
        )?;
        if updated == 0 {
            return Err(Error::AccountNotFound(account_number.to_string()));
        }
        Ok(())
    }

    /// Replace the four profile fields in one statement
    pub fn update_profile(&self, account_number: &str, update: &ProfileUpdate) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE accounts SET city = ?, address = ?, contact_number = ?, email = ?
             WHERE account_number = ?",
            params![
                update.city,
                update.address,
                update.contact_number,
                update.email,
                account_number,
            ],
        )?;
        if updated == 0 {
            return Err(Error::AccountNotFound(account_number.to_string()));
        }
        Ok(())
    }

    // === Transaction log operations ===

    /// Append one immutable record with the store's timestamp
    pub fn append_record(
        &self,
        account_number: &str,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        Self::insert_record(&conn, account_number, kind, amount)
    }

    /// Records for one account, chronological; id breaks timestamp ties so
    /// transfer legs keep their posting order
    pub fn records_for_account(&self, account_number: &str) -> Result<Vec<TransactionRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM transactions
             WHERE account_number = ? ORDER BY created_at, id"
        ))?;

        let rows = stmt.query_map(params![account_number], Self::row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    // === Atomic postings ===
    //
    // Each posting commits its balance updates and log appends as one unit
    // of work. A failure before commit rolls everything back, so a partial
    // posting is never visible.

    pub fn post_credit(&self, account_number: &str, amount: Decimal) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        Self::apply_balance_delta(&tx, account_number, amount)?;
        Self::insert_record(&tx, account_number, TransactionKind::Credit, amount)?;
        tx.commit()?;
        Ok(())
    }

    pub fn post_debit(&self, account_number: &str, amount: Decimal) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        Self::apply_balance_delta(&tx, account_number, -amount)?;
        Self::insert_record(&tx, account_number, TransactionKind::Debit, amount)?;
        tx.commit()?;
        Ok(())
    }

    /// Transfer posting: two balance updates and two records, all or nothing
    pub fn post_transfer(
        &self,
        source_number: &str,
        target_number: &str,
        amount: Decimal,
    ) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        Self::apply_balance_delta(&tx, source_number, -amount)?;
        Self::apply_balance_delta(&tx, target_number, amount)?;
        Self::insert_record(&tx, source_number, TransactionKind::TransferOut, amount)?;
        Self::insert_record(&tx, target_number, TransactionKind::TransferIn, amount)?;
        tx.commit()?;
        Ok(())
    }

    // === Status helpers ===

    pub fn get_account_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn get_active_account_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM accounts WHERE active",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn get_record_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Sum of all balances held
    pub fn get_total_balance(&self) -> Result<Decimal> {
        let conn = self.conn.lock().unwrap();
        let raw: String = conn.query_row(
            "SELECT COALESCE(SUM(balance), 0)::VARCHAR FROM accounts",
            [],
            |row| row.get(0),
        )?;
        parse_decimal(&raw)
    }

    pub fn get_db_size(&self) -> Result<u64> {
        // Actual file size from the filesystem
        let metadata = std::fs::metadata(&self.db_path)?;
        Ok(metadata.len())
    }

    // === Doctor checks ===

    /// Transaction records whose account_number has no account row
    pub fn check_orphaned_records(&self) -> Result<Vec<(i64, String)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT t.id, t.account_number FROM transactions t
             LEFT JOIN accounts a ON t.account_number = a.account_number
             WHERE a.account_number IS NULL
             ORDER BY t.id",
        )?;

        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut orphans = Vec::new();
        for row in rows {
            orphans.push(row?);
        }
        Ok(orphans)
    }

    /// Account numbers whose balance has gone negative (invariant breach)
    pub fn check_negative_balances(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT account_number FROM accounts WHERE balance < 0 ORDER BY id")?;

        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut numbers = Vec::new();
        for row in rows {
            numbers.push(row?);
        }
        Ok(numbers)
    }

    /// Account numbers appearing more than once (the UNIQUE constraint should
    /// make this impossible; a finding means the store was edited externally)
    pub fn check_duplicate_account_numbers(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT account_number FROM accounts
             GROUP BY account_number HAVING COUNT(*) > 1",
        )?;

        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut numbers = Vec::new();
        for row in rows {
            numbers.push(row?);
        }
        Ok(numbers)
    }

    /// Account numbers that are not 10 decimal digits.
    /// Checked in Rust rather than SQL regex to keep the query extension-free.
    pub fn check_malformed_account_numbers(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT account_number FROM accounts ORDER BY id")?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut malformed = Vec::new();
        for row in rows {
            let number = row?;
            if number.len() != 10 || !number.chars().all(|c| c.is_ascii_digit()) {
                malformed.push(number);
            }
        }
        Ok(malformed)
    }

    // === Row mapping ===

    fn row_to_account(row: &duckdb::Row) -> duckdb::Result<Account> {
        // Column indices from ACCOUNT_COLUMNS:
        // 0: id, 1: name, 2: account_number, 3: date_of_birth, 4: city,
        // 5: password_digest, 6: balance, 7: contact_number, 8: email,
        // 9: address, 10: active
        let dob_str: String = row.get(3)?;
        Ok(Account {
            id: row.get(0)?,
            name: row.get(1)?,
            account_number: row.get(2)?,
            date_of_birth: parse_date(&dob_str),
            city: row.get(4)?,
            password_digest: row.get(5)?,
            balance: decimal_column(row, 6)?,
            contact_number: row.get(7)?,
            email: row.get(8)?,
            address: row.get(9)?,
            active: row.get(10)?,
        })
    }

    fn row_to_record(row: &duckdb::Row) -> duckdb::Result<TransactionRecord> {
        // Column indices from RECORD_COLUMNS:
        // 0: id, 1: account_number, 2: kind, 3: amount, 4: created_at
        let kind_label: String = row.get(2)?;
        let kind = TransactionKind::parse(&kind_label).ok_or_else(|| {
            duckdb::Error::FromSqlConversionFailure(
                2,
                duckdb::types::Type::Text,
                format!("unknown transaction kind {kind_label:?}").into(),
            )
        })?;
        let ts_str: String = row.get(4)?;
        Ok(TransactionRecord {
            id: row.get(0)?,
            account_number: row.get(1)?,
            kind,
            amount: decimal_column(row, 3)?,
            timestamp: parse_timestamp(&ts_str),
        })
    }

    // === Shared write helpers (used directly and inside postings) ===

    fn apply_balance_delta(conn: &Connection, account_number: &str, delta: Decimal) -> Result<()> {
        let updated = conn.execute(
            "UPDATE accounts SET balance = balance + CAST(? AS DECIMAL(18,2))
             WHERE account_number = ?",
            params![delta.to_string(), account_number],
        )?;
        if updated == 0 {
            return Err(Error::AccountNotFound(account_number.to_string()));
        }
        Ok(())
    }

    fn insert_record(
        conn: &Connection,
        account_number: &str,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<()> {
        conn.execute(
            "INSERT INTO transactions (account_number, kind, amount)
             VALUES (?, ?, CAST(? AS DECIMAL(18,2)))",
            params![account_number, kind.as_str(), amount.to_string()],
        )?;
        Ok(())
    }
}

/// Parse a DECIMAL column read through a ::VARCHAR cast, exactly.
/// Money never goes through floats.
fn decimal_column(row: &duckdb::Row, idx: usize) -> duckdb::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str_exact(&raw).map_err(|e| {
        duckdb::Error::FromSqlConversionFailure(idx, duckdb::types::Type::Text, Box::new(e))
    })
}

fn parse_decimal(raw: &str) -> Result<Decimal> {
    Decimal::from_str_exact(raw)
        .map_err(|e| Error::database(format!("bad decimal {raw:?} from store: {e}")))
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|_| Utc::now().date_naive())
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    // DuckDB prints TIMESTAMP as "YYYY-MM-DD HH:MM:SS[.ffffff]"
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}
