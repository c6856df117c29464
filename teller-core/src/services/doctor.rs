//! Doctor service - store health checks

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use serde_json::json;

use crate::adapters::duckdb::DuckDbRepository;

/// Doctor service for health checks
pub struct DoctorService {
    repository: Arc<DuckDbRepository>,
}

impl DoctorService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Run all health checks
    pub fn run_checks(&self) -> Result<DoctorResult> {
        let mut checks = std::collections::HashMap::new();

        // Orphaned transaction records
        let orphans = self.repository.check_orphaned_records()?;
        let orphan_details: Vec<serde_json::Value> = orphans
            .iter()
            .map(|(record_id, account_number)| {
                json!({
                    "record_id": record_id,
                    "account_number": account_number
                })
            })
            .collect();
        checks.insert(
            "orphaned_records".to_string(),
            CheckResult {
                status: if orphans.is_empty() { "pass" } else { "error" }.to_string(),
                message: if orphans.is_empty() {
                    "No orphaned transaction records found".to_string()
                } else {
                    format!("{} record(s) reference missing accounts", orphans.len())
                },
                details: if orphans.is_empty() {
                    None
                } else {
                    Some(orphan_details)
                },
            },
        );

        // Negative balances
        let negatives = self.repository.check_negative_balances()?;
        let negative_details: Vec<serde_json::Value> = negatives
            .iter()
            .map(|n| json!({"account_number": n}))
            .collect();
        checks.insert(
            "negative_balances".to_string(),
            CheckResult {
                status: if negatives.is_empty() { "pass" } else { "error" }.to_string(),
                message: if negatives.is_empty() {
                    "No accounts with negative balances".to_string()
                } else {
                    format!("{} account(s) have a negative balance", negatives.len())
                },
                details: if negatives.is_empty() {
                    None
                } else {
                    Some(negative_details)
                },
            },
        );

        // Duplicate account numbers (should be impossible with the unique constraint)
        let duplicates = self.repository.check_duplicate_account_numbers()?;
        let dup_details: Vec<serde_json::Value> = duplicates
            .iter()
            .map(|n| json!({"account_number": n}))
            .collect();
        checks.insert(
            "duplicate_account_numbers".to_string(),
            CheckResult {
                status: if duplicates.is_empty() { "pass" } else { "error" }.to_string(),
                message: if duplicates.is_empty() {
                    "All account numbers are unique".to_string()
                } else {
                    format!("{} account number(s) appear more than once", duplicates.len())
                },
                details: if duplicates.is_empty() {
                    None
                } else {
                    Some(dup_details)
                },
            },
        );

        // Malformed account numbers (anything that is not exactly 10 digits)
        let malformed = self.repository.check_malformed_account_numbers()?;
        let malformed_details: Vec<serde_json::Value> = malformed
            .iter()
            .map(|n| json!({"account_number": n}))
            .collect();
        checks.insert(
            "malformed_account_numbers".to_string(),
            CheckResult {
                status: if malformed.is_empty() { "pass" } else { "warning" }.to_string(),
                message: if malformed.is_empty() {
                    "All account numbers are well formed".to_string()
                } else {
                    format!("{} account number(s) are not 10 digits", malformed.len())
                },
                details: if malformed.is_empty() {
                    None
                } else {
                    Some(malformed_details)
                },
            },
        );

        // Calculate summary
        let passed = checks.values().filter(|c| c.status == "pass").count() as i64;
        let warnings = checks.values().filter(|c| c.status == "warning").count() as i64;
        let errors = checks.values().filter(|c| c.status == "error").count() as i64;

        Ok(DoctorResult {
            checks,
            summary: DoctorSummary {
                passed,
                warnings,
                errors,
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorResult {
    pub checks: std::collections::HashMap<String, CheckResult>,
    pub summary: DoctorSummary,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub passed: i64,
    pub warnings: i64,
    pub errors: i64,
}
