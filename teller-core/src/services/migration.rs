//! Schema migrations for the DuckDB stores
//!
//! Migrations are SQL files embedded at compile time, applied in name order
//! and tracked in a sys_migrations table so reruns are no-ops. One runner
//! serves both databases; the main store and the audit store pass in their
//! own migration lists.

use std::collections::HashSet;

use anyhow::Result;
use duckdb::Connection;

/// The migration that creates the tracking table itself
const BOOTSTRAP_MIGRATION: &str = "000_migrations.sql";

/// What a run changed
#[derive(Debug)]
pub struct MigrationResult {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of migrations that were already applied
    pub already_applied: usize,
}

/// Applies one database's migration list over a borrowed connection
pub struct MigrationService<'a> {
    conn: &'a Connection,
    migrations: &'static [(&'static str, &'static str)],
}

impl<'a> MigrationService<'a> {
    pub fn new(conn: &'a Connection, migrations: &'static [(&'static str, &'static str)]) -> Self {
        Self { conn, migrations }
    }

    /// Bring the database up to date.
    ///
    /// If the tracking table is missing the bootstrap migration runs first;
    /// every other pending migration then applies in list order, each
    /// recorded as it lands.
    pub fn run_pending(&self) -> Result<MigrationResult> {
        let mut newly_applied = Vec::new();

        if !self.tracking_table_exists()? {
            let bootstrap = self
                .migrations
                .iter()
                .find(|(name, _)| *name == BOOTSTRAP_MIGRATION);
            if let Some((name, sql)) = bootstrap {
                self.conn.execute_batch(sql)?;
                self.mark_applied(name)?;
                newly_applied.push(name.to_string());
            }
        }

        let applied: HashSet<String> = self.get_applied()?.into_iter().collect();

        for (name, sql) in self.migrations.iter() {
            if applied.contains(*name) {
                continue;
            }
            self.conn.execute_batch(sql)?;
            self.mark_applied(name)?;
            newly_applied.push(name.to_string());
        }

        // Bootstrap counts as newly applied, not as a prior run
        let already_applied = applied
            .iter()
            .filter(|name| !newly_applied.contains(*name))
            .count();

        Ok(MigrationResult {
            applied: newly_applied,
            already_applied,
        })
    }

    /// Names recorded in sys_migrations, in name order
    pub fn get_applied(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT migration_name FROM sys_migrations ORDER BY migration_name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut applied = Vec::new();
        for name in rows {
            applied.push(name?);
        }
        Ok(applied)
    }

    /// Names in the list that have not been applied yet
    pub fn get_pending(&self) -> Result<Vec<String>> {
        let applied: HashSet<String> = self.get_applied()?.into_iter().collect();
        Ok(self
            .migrations
            .iter()
            .map(|(name, _)| name.to_string())
            .filter(|name| !applied.contains(name))
            .collect())
    }

    fn tracking_table_exists(&self) -> Result<bool> {
        let count: std::result::Result<i64, _> = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'sys_migrations'",
            [],
            |row| row.get(0),
        );
        Ok(matches!(count, Ok(n) if n > 0))
    }

    fn mark_applied(&self, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sys_migrations (migration_name) VALUES (?)",
            [name],
        )?;
        Ok(())
    }
}
