//! Statement command - export an account's transaction history
//!
//! Requires the holder's credentials but not an active account, so a
//! deactivated holder can still read their history.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;
use teller_core::services::AuditEvent;

use super::{get_context, password_or_prompt, record_audit};
use crate::output;

pub fn run(
    account: Option<String>,
    password: Option<String>,
    output_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let account_number = match account {
        Some(a) => a,
        None => Input::new()
            .with_prompt("Account number")
            .interact_text()?,
    };
    let password = password_or_prompt(password, "Password")?;

    let Some(account) = ctx
        .account_service
        .verify_credentials(&account_number, &password)?
    else {
        record_audit(
            &ctx,
            AuditEvent::new("statement_denied")
                .with_account(&account_number)
                .with_command("statement")
                .with_error("Invalid account number or password"),
        );
        anyhow::bail!("Invalid account number or password");
    };

    let records = ctx.repository.records_for_account(&account.account_number)?;

    record_audit(
        &ctx,
        AuditEvent::new("statement_exported")
            .with_account(&account.account_number)
            .with_command("statement"),
    );

    if let Some(path) = output_path {
        let mut writer = csv::Writer::from_path(&path)?;
        for record in &records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        output::success(&format!(
            "Wrote {} record(s) to {}",
            records.len(),
            path.display()
        ));
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No transactions for account {}.", account.account_number);
        return Ok(());
    }

    println!(
        "{}",
        format!("Statement for {} ({})", account.account_number, account.name).bold()
    );
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Kind", "Amount"]);
    for record in &records {
        table.add_row(vec![
            output::format_timestamp(&record.timestamp),
            record.kind.to_string(),
            output::format_money(&record.amount),
        ]);
    }
    println!("{}", table);
    println!();
    println!("Current balance: {}", output::format_money(&account.balance));

    Ok(())
}
