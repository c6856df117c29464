//! CLI command implementations

pub mod accounts;
pub mod audit;
pub mod doctor;
pub mod login;
pub mod open;
pub mod statement;
pub mod status;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::Password;
use teller_core::services::AuditEvent;
use teller_core::TellerContext;

/// Get the teller directory from environment or default
pub fn get_teller_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TELLER_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".teller")
    }
}

/// Get or create the teller context
pub fn get_context() -> Result<TellerContext> {
    let teller_dir = get_teller_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&teller_dir)
        .with_context(|| format!("Failed to create teller directory: {:?}", teller_dir))?;

    TellerContext::new(&teller_dir).context("Failed to initialize teller context")
}

/// Record an audit event, ignoring any errors (auditing never blocks an
/// operation)
pub fn record_audit(ctx: &TellerContext, event: AuditEvent) {
    if let Some(service) = &ctx.audit_service {
        let _ = service.record(event);
    }
}

/// Get a password from the --password flag, TELLER_PASSWORD, or a prompt
pub fn password_or_prompt(password_flag: Option<String>, prompt: &str) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }

    if let Ok(p) = env::var("TELLER_PASSWORD") {
        return Ok(p);
    }

    let p = Password::new().with_prompt(prompt).interact()?;
    Ok(p)
}

/// Get a password with confirmation, for account opening
pub fn password_with_confirm(password_flag: Option<String>) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }

    if let Ok(p) = env::var("TELLER_PASSWORD") {
        return Ok(p);
    }

    let p1 = Password::new().with_prompt("Choose a password").interact()?;
    let p2 = Password::new().with_prompt("Confirm password").interact()?;

    if p1 != p2 {
        anyhow::bail!("Passwords do not match");
    }
    Ok(p1)
}
